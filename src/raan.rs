//! Linear drift of the right ascension of the ascending node, `W(t) = w₀·t + W₀`.
use serde::Serialize;

use crate::constants::{Degree, RAAN_OFFSET, RAAN_RATE};

/// Coefficients of the linear RAAN model, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaanDrift {
    /// w₀, degrees per time unit
    pub rate: Degree,
    /// W₀, degrees at t = 0
    pub offset: Degree,
}

impl Default for RaanDrift {
    fn default() -> Self {
        RaanDrift {
            rate: RAAN_RATE,
            offset: RAAN_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaanSample {
    pub time: f64,
    #[serde(rename = "raan_deg")]
    pub raan: Degree,
}

impl RaanDrift {
    pub fn new(rate: Degree, offset: Degree) -> Self {
        RaanDrift { rate, offset }
    }

    #[inline]
    pub fn at(&self, time: f64) -> Degree {
        self.rate * time + self.offset
    }

    /// Evaluate the model at each time.
    pub fn series<I>(&self, times: I) -> Vec<RaanSample>
    where
        I: IntoIterator<Item = f64>,
    {
        times
            .into_iter()
            .map(|time| RaanSample {
                time,
                raan: self.at(time),
            })
            .collect()
    }
}

#[cfg(test)]
mod raan_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_coefficients() {
        let drift = RaanDrift::default();
        assert_eq!(drift.at(0.0), 30.0);
        assert_relative_eq!(drift.at(100.0), 31.0, epsilon = 1e-12);
    }

    #[test]
    fn test_series() {
        let samples = RaanDrift::new(2.0, -1.0).series([0.0, 0.5, 3.0]);
        assert_eq!(
            samples,
            vec![
                RaanSample { time: 0.0, raan: -1.0 },
                RaanSample { time: 0.5, raan: 0.0 },
                RaanSample { time: 3.0, raan: 5.0 },
            ]
        );
    }
}
