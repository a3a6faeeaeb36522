//! # Constants and type definitions for keplot
//!
//! This module centralizes the **numerical defaults** and **type aliases**
//! shared by the solver, the sampling pipeline and the renderers.
//!
//! ## Overview
//!
//! - Angle helpers (2π, unit aliases)
//! - Kepler solver defaults (tolerance, iteration cap)
//! - Driver defaults (eccentricity, time grid, RAAN drift coefficients)
//! - Output locations for the rendered figures

// -------------------------------------------------------------------------------------------------
// Angles
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Kepler solver defaults
// -------------------------------------------------------------------------------------------------

/// Default convergence threshold on |E − e·sin(E) − M|
pub const KEPLER_TOLERANCE: f64 = 1e-7;

/// Maximum number of Newton steps before giving up
pub const KEPLER_MAX_ITER: usize = 100;

// -------------------------------------------------------------------------------------------------
// Driver defaults
// -------------------------------------------------------------------------------------------------

/// Eccentricity of the sample orbit
pub const DEFAULT_ECCENTRICITY: f64 = 0.5;

/// First sampled time (strictly positive so the grid lies in (0, end])
pub const DEFAULT_T_START: f64 = 1e-5;

/// Last sampled time
pub const DEFAULT_T_END: f64 = 100.0;

/// Number of samples on the time grid
pub const DEFAULT_SAMPLES: usize = 1000;

/// Mean motion (rad per time unit), M = n·t
pub const DEFAULT_MEAN_MOTION: f64 = 1.0;

/// RAAN drift rate w₀ (degrees per time unit)
pub const RAAN_RATE: Degree = 0.01;

/// RAAN at t = 0, W₀ (degrees)
pub const RAAN_OFFSET: Degree = 30.0;

/// Directory receiving the rendered figures and CSV tables
pub const OUTPUT_DIR: &str = "figures";

pub const ORBIT_PLOT_FILE: &str = "orbit.png";
pub const RAAN_PLOT_FILE: &str = "raan.png";
pub const TRACK_CSV_FILE: &str = "track.csv";
pub const RAAN_CSV_FILE: &str = "raan.csv";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
