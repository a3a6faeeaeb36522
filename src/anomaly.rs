//! Conversions from the eccentric anomaly to the quantities drawn on the orbit plot.
//!
//! Distances are expressed in units of the semi-major axis, angles in radians.
use nalgebra::Vector2;

use crate::constants::Radian;

/// Which expression of `tan(θ/2)` to use in [`true_anomaly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrueAnomalyFormula {
    /// `tan(θ/2) = √((1+e)/(1−e)) · tan(E/2)`
    #[default]
    Standard,
    /// `tan(θ/2) = √3 · tan(E/2)` regardless of `e`.
    ///
    /// Kept to reproduce legacy figures bit for bit; it coincides with
    /// [`TrueAnomalyFormula::Standard`] only at `e = 0.5`.
    LegacySqrt3,
}

impl TrueAnomalyFormula {
    fn half_angle_factor(self, eccentricity: f64) -> f64 {
        match self {
            TrueAnomalyFormula::Standard => ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt(),
            TrueAnomalyFormula::LegacySqrt3 => 3f64.sqrt(),
        }
    }
}

/// Radial distance `r = 1 − e·cos(E)`.
#[inline]
pub fn radial_distance(eccentric_anomaly: Radian, eccentricity: f64) -> f64 {
    1.0 - eccentricity * eccentric_anomaly.cos()
}

/// True anomaly `θ = 2·atan(k·tan(E/2))`, in `(−π, π]`.
///
/// Arguments
/// -----------------
/// * `eccentric_anomaly`: `E` in radians.
/// * `eccentricity`: `e`, must be `< 1` for the standard factor to be real.
/// * `formula`: selects the factor `k`, see [`TrueAnomalyFormula`].
#[inline]
pub fn true_anomaly(
    eccentric_anomaly: Radian,
    eccentricity: f64,
    formula: TrueAnomalyFormula,
) -> Radian {
    2.0 * (formula.half_angle_factor(eccentricity) * (eccentric_anomaly / 2.0).tan()).atan()
}

/// Position in the orbital plane with the attracting focus at the origin:
/// `x = r·cos(θ)`, `y = r·sin(θ)`.
#[inline]
pub fn orbital_position(radius: f64, true_anomaly: Radian) -> Vector2<f64> {
    Vector2::new(radius * true_anomaly.cos(), radius * true_anomaly.sin())
}
