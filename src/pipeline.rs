//! # Orbit sampling pipeline
//!
//! This module turns a time grid into an [`OrbitTrack`] in three explicit stages:
//!
//! 1. **Sampling** – [`sample_mean_anomalies`] maps every time of the
//!    [`TimeGrid`] to a mean anomaly `M(t)`.
//! 2. **Solving** – each mean anomaly goes through
//!    [`solve_kepler_equation_observed`] independently.
//! 3. **Evaluation** – the eccentric anomaly is converted to radius, true anomaly and
//!    Cartesian position ([`crate::anomaly`]).
//!
//! The RAAN series is independent of the solver and is produced by
//! [`OrbitPipeline::raan_series`] on the same time grid.
//!
//! ## Failure handling
//!
//! A failing sample is never silently dropped:
//!
//! * [`FailurePolicy::Abort`] (default) stops at the first failure and returns
//!   [`KeplotError::SampleFailed`] carrying the sample index, mean anomaly and eccentricity.
//! * [`FailurePolicy::Skip`] keeps going; the failure is stored in
//!   [`OrbitTrack::failures`] and the sample is left out of [`OrbitTrack::points`].
//!
//! ## Example
//!
//! ```rust
//! use keplot::pipeline::{OrbitConfig, OrbitPipeline};
//!
//! let config = OrbitConfig::builder()
//!     .eccentricity(0.3)
//!     .samples(200)
//!     .build()
//!     .unwrap();
//! let track = OrbitPipeline::new(config).run().unwrap();
//! assert_eq!(track.points.len(), 200);
//! ```
use std::cmp::Ordering::Less;

use nalgebra::Vector2;
use serde::Serialize;

use crate::anomaly::{orbital_position, radial_distance, true_anomaly, TrueAnomalyFormula};
use crate::constants::{Radian, DEFAULT_ECCENTRICITY};
use crate::kepler::{
    kepler_residual, solve_kepler_equation_observed, IterationObserver, KeplerParams,
    KeplerParamsBuilder, KeplerSolution, TracingObserver,
};
use crate::keplot_errors::KeplotError;
use crate::raan::{RaanDrift, RaanSample};
use crate::sampling::{sample_mean_anomalies, MeanMotion, TimeGrid};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// What to do when the solver fails on one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

/// Everything the pipeline needs to produce a track.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitConfig {
    pub eccentricity: f64,
    pub kepler: KeplerParams,
    pub grid: TimeGrid,
    pub motion: MeanMotion,
    pub raan: RaanDrift,
    pub true_anomaly_formula: TrueAnomalyFormula,
    pub failure_policy: FailurePolicy,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        OrbitConfig {
            eccentricity: DEFAULT_ECCENTRICITY,
            kepler: KeplerParams::default(),
            grid: TimeGrid::default(),
            motion: MeanMotion::default(),
            raan: RaanDrift::default(),
            true_anomaly_formula: TrueAnomalyFormula::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl OrbitConfig {
    pub fn builder() -> OrbitConfigBuilder {
        OrbitConfigBuilder::new()
    }
}

/// Builder for [`OrbitConfig`], with validation.
#[derive(Debug, Clone, Default)]
pub struct OrbitConfigBuilder {
    config: OrbitConfig,
    kepler: KeplerParamsBuilder,
}

impl OrbitConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: OrbitConfig::default(),
            kepler: KeplerParams::builder(),
        }
    }

    pub fn eccentricity(mut self, v: f64) -> Self {
        self.config.eccentricity = v;
        self
    }

    // --- Solver ---
    pub fn tolerance(mut self, v: f64) -> Self {
        self.kepler = self.kepler.tolerance(v);
        self
    }
    pub fn max_iter(mut self, v: usize) -> Self {
        self.kepler = self.kepler.max_iter(v);
        self
    }
    pub fn strict_eccentricity(mut self, v: bool) -> Self {
        self.kepler = self.kepler.strict_eccentricity(v);
        self
    }

    // --- Sampling ---
    pub fn time_range(mut self, start: f64, end: f64) -> Self {
        self.config.grid.start = start;
        self.config.grid.end = end;
        self
    }
    pub fn samples(mut self, v: usize) -> Self {
        self.config.grid.samples = v;
        self
    }
    pub fn mean_motion(mut self, v: f64) -> Self {
        self.config.motion.rate = v;
        self
    }
    pub fn epoch_anomaly(mut self, v: Radian) -> Self {
        self.config.motion.epoch_anomaly = v;
        self
    }

    // --- Downstream ---
    pub fn raan(mut self, v: RaanDrift) -> Self {
        self.config.raan = v;
        self
    }
    pub fn true_anomaly_formula(mut self, v: TrueAnomalyFormula) -> Self {
        self.config.true_anomaly_formula = v;
        self
    }
    pub fn failure_policy(mut self, v: FailurePolicy) -> Self {
        self.config.failure_policy = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * solver rules of [`KeplerParamsBuilder::build`],
    /// * `eccentricity`, `mean_motion`, `epoch_anomaly` and both time bounds are finite,
    /// * `start ≤ end`.
    ///
    /// The eccentricity range itself is only checked when strict mode is on, in the solver.
    pub fn build(mut self) -> Result<OrbitConfig, KeplotError> {
        self.config.kepler = self.kepler.build()?;
        let c = &self.config;

        if !c.eccentricity.is_finite() {
            return Err(KeplotError::InvalidParameter(
                "eccentricity must be finite".into(),
            ));
        }
        if !c.grid.start.is_finite() || !c.grid.end.is_finite() {
            return Err(KeplotError::InvalidParameter(
                "time bounds must be finite".into(),
            ));
        }
        if c.grid.end.partial_cmp(&c.grid.start) == Some(Less) {
            return Err(KeplotError::InvalidParameter(
                "time range end must not precede its start".into(),
            ));
        }
        if !c.motion.rate.is_finite() || !c.motion.epoch_anomaly.is_finite() {
            return Err(KeplotError::InvalidParameter(
                "mean motion must be finite".into(),
            ));
        }

        Ok(self.config)
    }
}

/// One solved sample of the orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPoint {
    pub time: f64,
    pub mean_anomaly: Radian,
    pub eccentric_anomaly: Radian,
    pub iterations: usize,
    pub radius: f64,
    pub true_anomaly: Radian,
    pub position: Vector2<f64>,
}

/// Flat view of an [`OrbitPoint`] used for tabular export.
#[derive(Debug, Serialize)]
pub(crate) struct OrbitRow {
    time: f64,
    mean_anomaly: f64,
    eccentric_anomaly: f64,
    iterations: usize,
    radius: f64,
    true_anomaly: f64,
    x: f64,
    y: f64,
}

impl From<&OrbitPoint> for OrbitRow {
    fn from(p: &OrbitPoint) -> Self {
        OrbitRow {
            time: p.time,
            mean_anomaly: p.mean_anomaly,
            eccentric_anomaly: p.eccentric_anomaly,
            iterations: p.iterations,
            radius: p.radius,
            true_anomaly: p.true_anomaly,
            x: p.position.x,
            y: p.position.y,
        }
    }
}

/// A sample the solver could not handle under [`FailurePolicy::Skip`].
#[derive(Debug, PartialEq)]
pub struct SampleFailure {
    pub index: usize,
    pub time: f64,
    pub mean_anomaly: Radian,
    pub error: KeplotError,
}

/// Output of [`OrbitPipeline::run`].
#[derive(Debug, PartialEq)]
pub struct OrbitTrack {
    pub eccentricity: f64,
    pub points: Vec<OrbitPoint>,
    pub failures: Vec<SampleFailure>,
}

impl OrbitTrack {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Cartesian positions in sampling order.
    pub fn positions(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.points.iter().map(|p| p.position)
    }

    pub fn total_iterations(&self) -> usize {
        self.points.iter().map(|p| p.iterations).sum()
    }
}

#[derive(Debug, Clone)]
pub struct OrbitPipeline {
    config: OrbitConfig,
}

impl OrbitPipeline {
    pub fn new(config: OrbitConfig) -> Self {
        OrbitPipeline { config }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Run the pipeline, reporting solver progress through `tracing`.
    pub fn run(&self) -> Result<OrbitTrack, KeplotError> {
        self.run_observed(&mut TracingObserver)
    }

    /// Run the pipeline with a caller-provided observer, shared by every sample.
    ///
    /// Return
    /// ----------
    /// * `Ok(OrbitTrack)`; under [`FailurePolicy::Skip`] it may contain failures.
    /// * `Err(KeplotError::SampleFailed)` under [`FailurePolicy::Abort`].
    pub fn run_observed(
        &self,
        observer: &mut impl IterationObserver,
    ) -> Result<OrbitTrack, KeplotError> {
        let cfg = &self.config;
        let e = cfg.eccentricity;
        let samples = sample_mean_anomalies(&cfg.grid, &cfg.motion);

        if let Some(&(_, m0)) = samples.first() {
            tracing::info!(
                samples = samples.len(),
                eccentricity = e,
                tolerance = cfg.kepler.tolerance,
                initial_residual = kepler_residual(m0, e, m0).abs(),
                "solving Kepler equation"
            );
        }

        #[cfg(feature = "progress")]
        let pb = {
            let pb = ProgressBar::new(samples.len().max(1) as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb.enable_steady_tick(Duration::from_millis(200));
            pb
        };

        let mut points = Vec::with_capacity(samples.len());
        let mut failures = Vec::new();

        for (index, (time, mean_anomaly)) in samples.into_iter().enumerate() {
            let outcome =
                solve_kepler_equation_observed(mean_anomaly, e, &cfg.kepler, &mut *observer)
                    .and_then(|sol| self.orbit_point(time, mean_anomaly, &sol));

            #[cfg(feature = "progress")]
            pb.inc(1);

            match outcome {
                Ok(point) => points.push(point),
                Err(err) => {
                    tracing::error!(index, mean_anomaly, eccentricity = e, error = %err, "sample failed");
                    match cfg.failure_policy {
                        FailurePolicy::Abort => {
                            #[cfg(feature = "progress")]
                            pb.abandon();
                            return Err(err.at_sample(index, mean_anomaly, e));
                        }
                        FailurePolicy::Skip => failures.push(SampleFailure {
                            index,
                            time,
                            mean_anomaly,
                            error: err,
                        }),
                    }
                }
            }
        }

        #[cfg(feature = "progress")]
        pb.finish_and_clear();

        let track = OrbitTrack {
            eccentricity: e,
            points,
            failures,
        };
        tracing::info!(
            solved = track.points.len(),
            failed = track.failures.len(),
            total_iterations = track.total_iterations(),
            "orbit track complete"
        );
        Ok(track)
    }

    /// Downstream evaluation of one solved sample.
    ///
    /// A converged eccentric anomaly can still give a non-finite point (e.g. `e = 1` at
    /// `E = 0`, where the true anomaly is `2·atan(∞·0)`); such samples are reported as
    /// [`KeplotError::NonFinite`] instead of reaching the track.
    fn orbit_point(
        &self,
        time: f64,
        mean_anomaly: Radian,
        sol: &KeplerSolution,
    ) -> Result<OrbitPoint, KeplotError> {
        let e = self.config.eccentricity;
        let radius = radial_distance(sol.eccentric_anomaly, e);
        let theta = true_anomaly(sol.eccentric_anomaly, e, self.config.true_anomaly_formula);
        let position = orbital_position(radius, theta);

        if !(radius.is_finite() && theta.is_finite() && position.iter().all(|c| c.is_finite())) {
            return Err(KeplotError::NonFinite {
                mean_anomaly,
                eccentricity: e,
                eccentric_anomaly: sol.eccentric_anomaly,
            });
        }

        Ok(OrbitPoint {
            time,
            mean_anomaly,
            eccentric_anomaly: sol.eccentric_anomaly,
            iterations: sol.iterations,
            radius,
            true_anomaly: theta,
            position,
        })
    }

    /// RAAN drift evaluated on the configured time grid.
    pub fn raan_series(&self) -> Vec<RaanSample> {
        self.config.raan.series(self.config.grid.times())
    }
}
