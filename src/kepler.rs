//! # Kepler equation solver
//!
//! Newton–Raphson root finding on the residual
//!
//! ```text
//! g(E) = E − e·sin(E) − M,      g'(E) = 1 − e·cos(E)
//! ```
//!
//! starting from `E₀ = M` and stopping as soon as `|g(E)| ≤ tolerance`.
//!
//! Components
//! -----------------
//! * [`KeplerParams`] – tolerance and iteration cap, built through
//!   [`KeplerParams::builder`] which validates the values.
//! * [`solve_kepler_equation`] – the pure entry point.
//! * [`solve_kepler_equation_observed`] – same solver, reporting each Newton step
//!   to an [`IterationObserver`].
//! * [`TracingObserver`], [`ResidualHistory`], [`NoopObserver`] – ready-made observers.
//!
//! Notes
//! -----------------
//! * The mean anomaly is **not** normalized to `[0, 2π)`; the returned eccentric anomaly
//!   lives on the same branch as the input.
//! * The eccentricity is not validated unless
//!   [`KeplerParamsBuilder::strict_eccentricity`] is enabled.
//! * When the initial guess already satisfies the tolerance (e.g. `M = 0`), no Newton step
//!   is taken and the derivative is never evaluated: [`KeplerSolution::iterations`] is `0`.
use std::cmp::Ordering::Greater;

use crate::constants::{Radian, KEPLER_MAX_ITER, KEPLER_TOLERANCE};
use crate::keplot_errors::KeplotError;

/// Residual of the Kepler equation, `E − e·sin(E) − M`.
#[inline]
pub fn kepler_residual(eccentric_anomaly: Radian, eccentricity: f64, mean_anomaly: Radian) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin() - mean_anomaly
}

/// Numerical controls of the Newton iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerParams {
    /// Convergence threshold on `|g(E)|`.
    pub tolerance: f64,
    /// Maximum number of Newton steps.
    pub max_iter: usize,
    /// Reject eccentricities outside `[0, 1)` before iterating.
    pub strict_eccentricity: bool,
}

impl KeplerParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a validating builder initialized with the defaults
    /// (`tolerance = 1e-7`, `max_iter = 100`, lenient eccentricity).
    ///
    /// ```rust
    /// use keplot::kepler::KeplerParams;
    ///
    /// let params = KeplerParams::builder()
    ///     .tolerance(1e-12)
    ///     .max_iter(50)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.max_iter, 50);
    /// ```
    pub fn builder() -> KeplerParamsBuilder {
        KeplerParamsBuilder::new()
    }
}

impl Default for KeplerParams {
    fn default() -> Self {
        KeplerParams {
            tolerance: KEPLER_TOLERANCE,
            max_iter: KEPLER_MAX_ITER,
            strict_eccentricity: false,
        }
    }
}

/// Builder for [`KeplerParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct KeplerParamsBuilder {
    params: KeplerParams,
}

impl KeplerParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: KeplerParams::default(),
        }
    }

    pub fn tolerance(mut self, v: f64) -> Self {
        self.params.tolerance = v;
        self
    }
    pub fn max_iter(mut self, v: usize) -> Self {
        self.params.max_iter = v;
        self
    }
    pub fn strict_eccentricity(mut self, v: bool) -> Self {
        self.params.strict_eccentricity = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `tolerance > 0.0` and not NaN.
    /// * `max_iter ≥ 1`.
    ///
    /// Return
    /// ----------
    /// * `Err(KeplotError::InvalidParameter)` if a rule fails.
    pub fn build(self) -> Result<KeplerParams, KeplotError> {
        let p = &self.params;

        if !Self::gt0(p.tolerance) {
            return Err(KeplotError::InvalidParameter(
                "tolerance must be > 0".into(),
            ));
        }
        if p.max_iter == 0 {
            return Err(KeplotError::InvalidParameter(
                "max_iter must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Converged eccentric anomaly together with convergence diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub eccentric_anomaly: Radian,
    /// Number of Newton steps actually taken (`0` if the initial guess was accepted).
    pub iterations: usize,
    /// Final residual `g(E)`, with `|residual| ≤ tolerance`.
    pub residual: f64,
}

/// Hook into the Newton iteration.
///
/// Every method has an empty default so observers only implement what they need.
pub trait IterationObserver {
    /// Called once before the first Newton step with the residual of `E₀ = M`.
    fn on_start(&mut self, _mean_anomaly: Radian, _eccentricity: f64, _residual: f64) {}

    /// Called after each Newton step with the new iterate and its residual.
    fn on_step(&mut self, _iteration: usize, _eccentric_anomaly: Radian, _residual: f64) {}

    /// Called once when the tolerance is met.
    fn on_converged(&mut self, _solution: &KeplerSolution) {}
}

impl<T: IterationObserver + ?Sized> IterationObserver for &mut T {
    fn on_start(&mut self, mean_anomaly: Radian, eccentricity: f64, residual: f64) {
        (**self).on_start(mean_anomaly, eccentricity, residual)
    }

    fn on_step(&mut self, iteration: usize, eccentric_anomaly: Radian, residual: f64) {
        (**self).on_step(iteration, eccentric_anomaly, residual)
    }

    fn on_converged(&mut self, solution: &KeplerSolution) {
        (**self).on_converged(solution)
    }
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IterationObserver for NoopObserver {}

/// Emits `tracing` events: the initial residual and the convergence summary at
/// `debug` level, each Newton step at `trace` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl IterationObserver for TracingObserver {
    fn on_start(&mut self, mean_anomaly: Radian, eccentricity: f64, residual: f64) {
        tracing::debug!(
            mean_anomaly,
            eccentricity,
            initial_residual = residual.abs(),
            "starting Kepler iteration"
        );
    }

    fn on_step(&mut self, iteration: usize, eccentric_anomaly: Radian, residual: f64) {
        tracing::trace!(iteration, eccentric_anomaly, residual, "newton step");
    }

    fn on_converged(&mut self, solution: &KeplerSolution) {
        tracing::debug!(
            iterations = solution.iterations,
            eccentric_anomaly = solution.eccentric_anomaly,
            "converged"
        );
    }
}

/// Records `|g(E)|` for the initial guess and after every Newton step.
#[derive(Debug, Clone, Default)]
pub struct ResidualHistory {
    pub residuals: Vec<f64>,
}

impl IterationObserver for ResidualHistory {
    fn on_start(&mut self, _mean_anomaly: Radian, _eccentricity: f64, residual: f64) {
        self.residuals.clear();
        self.residuals.push(residual.abs());
    }

    fn on_step(&mut self, _iteration: usize, _eccentric_anomaly: Radian, residual: f64) {
        self.residuals.push(residual.abs());
    }
}

/// One Newton update of the eccentric anomaly.
///
/// Return
/// ----------
/// * `Ok((E_next, g(E_next)))`.
/// * `Err(KeplotError::DegenerateDerivative)` if `1 − e·cos(E)` is exactly zero at `E`.
fn newton_step(
    eccentric_anomaly: Radian,
    eccentricity: f64,
    mean_anomaly: Radian,
) -> Result<(Radian, f64), KeplotError> {
    let residual = kepler_residual(eccentric_anomaly, eccentricity, mean_anomaly);
    let derivative = 1.0 - eccentricity * eccentric_anomaly.cos();
    if derivative == 0.0 {
        return Err(KeplotError::DegenerateDerivative {
            mean_anomaly,
            eccentricity,
            eccentric_anomaly,
        });
    }

    let next = eccentric_anomaly - residual / derivative;
    Ok((next, kepler_residual(next, eccentricity, mean_anomaly)))
}

/// Solve `M = E − e·sin(E)` for the eccentric anomaly.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: `M` in radians, any real value.
/// * `eccentricity`: `e`, intended in `[0, 1)`.
/// * `params`: tolerance and iteration cap.
///
/// Return
/// ----------
/// * `Ok(KeplerSolution)` with `|E − e·sin(E) − M| ≤ params.tolerance`.
/// * `Err(KeplotError::DegenerateDerivative)` if `1 − e·cos(E)` is exactly zero at an iterate.
/// * `Err(KeplotError::NonConvergence)` if the cap is reached or the iteration leaves
///   the finite numbers.
/// * `Err(KeplotError::InvalidParameter)` in strict mode when `e ∉ [0, 1)`.
///
/// See also
/// ------------
/// * [`solve_kepler_equation_observed`] – same solver with per-step reporting.
pub fn solve_kepler_equation(
    mean_anomaly: Radian,
    eccentricity: f64,
    params: &KeplerParams,
) -> Result<KeplerSolution, KeplotError> {
    solve_kepler_equation_observed(mean_anomaly, eccentricity, params, &mut NoopObserver)
}

/// Solve the Kepler equation, notifying `observer` of every Newton step.
///
/// The observer only sees the iteration; it cannot alter it, so the result is the same as
/// [`solve_kepler_equation`] for identical inputs.
pub fn solve_kepler_equation_observed(
    mean_anomaly: Radian,
    eccentricity: f64,
    params: &KeplerParams,
    observer: &mut impl IterationObserver,
) -> Result<KeplerSolution, KeplotError> {
    if params.strict_eccentricity && !(0.0..1.0).contains(&eccentricity) {
        return Err(KeplotError::InvalidParameter(format!(
            "eccentricity {eccentricity} outside [0, 1)"
        )));
    }

    let mut ecc_anom = mean_anomaly;
    let mut residual = kepler_residual(ecc_anom, eccentricity, mean_anomaly);
    let mut iterations = 0;
    observer.on_start(mean_anomaly, eccentricity, residual);

    while residual.is_nan() || residual.abs() > params.tolerance {
        if iterations >= params.max_iter {
            return Err(KeplotError::NonConvergence {
                mean_anomaly,
                eccentricity,
                iterations,
                residual,
            });
        }

        (ecc_anom, residual) = newton_step(ecc_anom, eccentricity, mean_anomaly)?;
        iterations += 1;
        observer.on_step(iterations, ecc_anom, residual);

        if !ecc_anom.is_finite() || !residual.is_finite() {
            return Err(KeplotError::NonConvergence {
                mean_anomaly,
                eccentricity,
                iterations,
                residual,
            });
        }
    }

    let solution = KeplerSolution {
        eccentric_anomaly: ecc_anom,
        iterations,
        residual,
    };
    observer.on_converged(&solution);
    Ok(solution)
}
