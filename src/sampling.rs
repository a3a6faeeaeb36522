//! Time grids and the mean anomalies derived from them.
use crate::constants::{
    Radian, DEFAULT_MEAN_MOTION, DEFAULT_SAMPLES, DEFAULT_T_END, DEFAULT_T_START,
};

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// `n = 0` gives an empty vector and `n = 1` gives `[start]`.
/// The last value is exactly `end`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Evenly sampled time interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl Default for TimeGrid {
    fn default() -> Self {
        TimeGrid {
            start: DEFAULT_T_START,
            end: DEFAULT_T_END,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl TimeGrid {
    pub fn new(start: f64, end: f64, samples: usize) -> Self {
        TimeGrid {
            start,
            end,
            samples,
        }
    }

    pub fn times(&self) -> Vec<f64> {
        linspace(self.start, self.end, self.samples)
    }
}

/// Mean anomaly as a linear function of time, `M(t) = n·t + M₀`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanMotion {
    pub rate: f64,
    pub epoch_anomaly: Radian,
}

impl Default for MeanMotion {
    fn default() -> Self {
        MeanMotion {
            rate: DEFAULT_MEAN_MOTION,
            epoch_anomaly: 0.0,
        }
    }
}

impl MeanMotion {
    #[inline]
    pub fn mean_anomaly(&self, time: f64) -> Radian {
        self.rate * time + self.epoch_anomaly
    }
}

/// Pair each time of `grid` with its mean anomaly.
pub fn sample_mean_anomalies(grid: &TimeGrid, motion: &MeanMotion) -> Vec<(f64, Radian)> {
    grid.times()
        .into_iter()
        .map(|t| (t, motion.mean_anomaly(t)))
        .collect()
}

#[cfg(test)]
mod sampling_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_edges() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_default_grid() {
        let times = TimeGrid::default().times();
        assert_eq!(times.len(), 1000);
        assert_eq!(times[0], 1e-5);
        assert_eq!(*times.last().unwrap(), 100.0);
        assert!(times.iter().all(|&t| t > 0.0 && t <= 100.0));
        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_mean_anomaly_samples() {
        let grid = TimeGrid::new(0.0, 2.0, 3);
        let motion = MeanMotion {
            rate: 0.5,
            epoch_anomaly: 0.1,
        };
        let samples = sample_mean_anomalies(&grid, &motion);
        assert_eq!(samples.len(), 3);
        assert_relative_eq!(samples[1].0, 1.0);
        assert_relative_eq!(samples[1].1, 0.6);
        assert_relative_eq!(samples[2].1, 1.1);
    }
}
