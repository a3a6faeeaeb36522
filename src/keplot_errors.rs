use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeplotError {
    #[error(
        "Kepler equation did not converge for M = {mean_anomaly}, e = {eccentricity} \
         after {iterations} iterations (last residual {residual:e})"
    )]
    NonConvergence {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
        residual: f64,
    },

    #[error(
        "Newton derivative 1 - e·cos(E) vanished at E = {eccentric_anomaly} \
         (M = {mean_anomaly}, e = {eccentricity})"
    )]
    DegenerateDerivative {
        mean_anomaly: f64,
        eccentricity: f64,
        eccentric_anomaly: f64,
    },

    #[error(
        "Orbit point is not finite for M = {mean_anomaly}, e = {eccentricity} \
         (E = {eccentric_anomaly})"
    )]
    NonFinite {
        mean_anomaly: f64,
        eccentricity: f64,
        eccentric_anomaly: f64,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Sample {index} failed (M = {mean_anomaly}, e = {eccentricity}): {source}")]
    SampleFailed {
        index: usize,
        mean_anomaly: f64,
        eccentricity: f64,
        #[source]
        source: Box<KeplotError>,
    },

    #[error("Nothing to render: {0}")]
    EmptySeries(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),
}

impl KeplotError {
    /// Wrap a solver error with the position of the sample that produced it.
    pub(crate) fn at_sample(self, index: usize, mean_anomaly: f64, eccentricity: f64) -> Self {
        KeplotError::SampleFailed {
            index,
            mean_anomaly,
            eccentricity,
            source: Box::new(self),
        }
    }
}

impl PartialEq for KeplotError {
    fn eq(&self, other: &Self) -> bool {
        use KeplotError::*;
        match (self, other) {
            (
                NonConvergence {
                    mean_anomaly: m1,
                    eccentricity: e1,
                    iterations: i1,
                    residual: r1,
                },
                NonConvergence {
                    mean_anomaly: m2,
                    eccentricity: e2,
                    iterations: i2,
                    residual: r2,
                },
            ) => m1 == m2 && e1 == e2 && i1 == i2 && (r1 == r2 || (r1.is_nan() && r2.is_nan())),
            (
                DegenerateDerivative {
                    mean_anomaly: m1,
                    eccentricity: e1,
                    eccentric_anomaly: x1,
                },
                DegenerateDerivative {
                    mean_anomaly: m2,
                    eccentricity: e2,
                    eccentric_anomaly: x2,
                },
            ) => m1 == m2 && e1 == e2 && x1 == x2,
            (
                NonFinite {
                    mean_anomaly: m1,
                    eccentricity: e1,
                    eccentric_anomaly: x1,
                },
                NonFinite {
                    mean_anomaly: m2,
                    eccentricity: e2,
                    eccentric_anomaly: x2,
                },
            ) => m1 == m2 && e1 == e2 && x1 == x2,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (
                SampleFailed {
                    index: i1,
                    source: s1,
                    ..
                },
                SampleFailed {
                    index: i2,
                    source: s2,
                    ..
                },
            ) => i1 == i2 && s1 == s2,
            (EmptySeries(a), EmptySeries(b)) => a == b,

            // Not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (ImageError(_), ImageError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
