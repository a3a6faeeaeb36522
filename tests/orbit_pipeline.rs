mod common;

use camino::Utf8PathBuf;
use keplot::anomaly::TrueAnomalyFormula;
use keplot::export::{write_raan_csv, write_track_csv};
use keplot::kepler::kepler_residual;
use keplot::pipeline::{OrbitConfig, OrbitPipeline};
use keplot::render::{render_orbit_plot, render_raan_plot, PlotStyle};
use tempfile::TempDir;

use crate::common::assert_point_consistent;

fn utf8_dir(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("temp dir is not UTF-8")
}

#[test]
fn batch_of_thousand_samples_converges() {
    let config = OrbitConfig::builder()
        .eccentricity(0.5)
        .tolerance(1e-7)
        .time_range(1e-5, 100.0)
        .samples(1000)
        .build()
        .unwrap();
    let track = OrbitPipeline::new(config).run().unwrap();

    assert!(track.is_complete());
    assert_eq!(track.points.len(), 1000);
    assert_eq!(track.points[0].mean_anomaly, 1e-5);
    assert_eq!(track.points[999].time, 100.0);

    for point in &track.points {
        assert!(point.time > 0.0 && point.time <= 100.0);
        let g = kepler_residual(point.eccentric_anomaly, 0.5, point.mean_anomaly);
        assert!(g.abs() <= 1e-7, "{point:?}");
        assert_point_consistent(point, 0.5, 1e-12);
        assert!(point.radius >= 0.5 - 1e-12 && point.radius <= 1.5 + 1e-12);
    }
}

#[test]
fn first_sample_matches_small_anomaly_scenario() {
    let track = OrbitPipeline::new(OrbitConfig::default()).run().unwrap();
    let first = &track.points[0];
    assert!(first.iterations >= 1 && first.iterations <= 3);
    assert!((first.eccentric_anomaly - 2e-5).abs() < 1e-10);
    assert!((first.radius - 0.5).abs() < 1e-9);
}

#[test]
fn legacy_formula_changes_positions_off_half_eccentricity() {
    let base = OrbitConfig::builder()
        .eccentricity(0.2)
        .samples(50)
        .time_range(0.1, 5.0);
    let standard = OrbitPipeline::new(base.clone().build().unwrap())
        .run()
        .unwrap();
    let legacy = OrbitPipeline::new(
        base.true_anomaly_formula(TrueAnomalyFormula::LegacySqrt3)
            .build()
            .unwrap(),
    )
    .run()
    .unwrap();

    // Same eccentric anomalies, different true anomalies.
    for (s, l) in standard.points.iter().zip(&legacy.points) {
        assert_eq!(s.eccentric_anomaly, l.eccentric_anomaly);
    }
    assert!(standard
        .points
        .iter()
        .zip(&legacy.points)
        .any(|(s, l)| (s.true_anomaly - l.true_anomaly).abs() > 1e-3));
}

#[test]
fn figures_are_written() {
    let tmp = TempDir::new().unwrap();
    let out = utf8_dir(&tmp).join("nested").join("figures");

    let pipeline = OrbitPipeline::new(
        OrbitConfig::builder()
            .samples(300)
            .time_range(0.01, 20.0)
            .build()
            .unwrap(),
    );
    let track = pipeline.run().unwrap();
    let style = PlotStyle {
        width: 320,
        height: 240,
        margin: 16,
        ..PlotStyle::default()
    };

    let orbit_png = out.join("orbit.png");
    let raan_png = out.join("raan.png");
    render_orbit_plot(&track, &orbit_png, &style).unwrap();
    render_raan_plot(&pipeline.raan_series(), &raan_png, &style).unwrap();

    for path in [&orbit_png, &raan_png] {
        let img = image::open(path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (320, 240));
        let painted = img.pixels().filter(|p| **p != style.background).count();
        assert!(painted > 100, "{path} looks blank");
    }

    let orbit = image::open(&orbit_png).unwrap().to_rgb8();
    assert!(orbit.pixels().any(|p| *p == style.marker));
    assert!(orbit.pixels().any(|p| *p == style.trace));
}

#[test]
fn tables_are_written() {
    let tmp = TempDir::new().unwrap();
    let out = utf8_dir(&tmp);

    let pipeline = OrbitPipeline::new(OrbitConfig::builder().samples(40).build().unwrap());
    let track = pipeline.run().unwrap();
    let raan = pipeline.raan_series();

    let track_csv = out.join("track.csv");
    let raan_csv = out.join("raan.csv");
    assert_eq!(write_track_csv(&track, &track_csv).unwrap(), 40);
    assert_eq!(write_raan_csv(&raan, &raan_csv).unwrap(), 40);

    let mut reader = csv::Reader::from_path(&track_csv).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "time",
            "mean_anomaly",
            "eccentric_anomaly",
            "iterations",
            "radius",
            "true_anomaly",
            "x",
            "y"
        ]
    );
    assert_eq!(reader.records().count(), 40);

    let mut reader = csv::Reader::from_path(&raan_csv).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["time", "raan_deg"]
    );
    let first = reader.records().next().unwrap().unwrap();
    assert_eq!(first[1].parse::<f64>().unwrap(), raan[0].raan);
}
