pub mod anomaly;
pub mod constants;
pub mod export;
pub mod kepler;
pub mod keplot_errors;
pub mod logging;
pub mod pipeline;
pub mod raan;
pub mod render;
pub mod sampling;
