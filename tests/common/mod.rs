use approx::assert_relative_eq;
use keplot::kepler::{kepler_residual, KeplerSolution};
use keplot::pipeline::OrbitPoint;

pub fn assert_is_root(sol: &KeplerSolution, mean_anomaly: f64, eccentricity: f64, tol: f64) {
    let residual = kepler_residual(sol.eccentric_anomaly, eccentricity, mean_anomaly);
    assert!(
        residual.abs() <= tol,
        "|g(E)| = {} > {tol} for M = {mean_anomaly}, e = {eccentricity}",
        residual.abs()
    );
    assert_eq!(residual, sol.residual);
}

pub fn assert_point_consistent(point: &OrbitPoint, eccentricity: f64, epsilon: f64) {
    assert_relative_eq!(
        point.radius,
        1.0 - eccentricity * point.eccentric_anomaly.cos(),
        epsilon = epsilon
    );
    assert_relative_eq!(point.position.norm(), point.radius, epsilon = epsilon);
    assert_relative_eq!(
        point.position.y.atan2(point.position.x),
        point.true_anomaly,
        epsilon = epsilon
    );
}
