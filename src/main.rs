//! Solve Kepler's equation over a fixed time grid and write the orbit and RAAN figures.
//!
//! All physical constants are fixed; only the log verbosity can be changed, through `RUST_LOG`
//! (e.g. `RUST_LOG=debug` prints one convergence line per sample).
use std::process::ExitCode;

use camino::Utf8PathBuf;

use keplot::constants::{
    DEFAULT_ECCENTRICITY, DEFAULT_SAMPLES, DEFAULT_T_END, DEFAULT_T_START, KEPLER_TOLERANCE,
    ORBIT_PLOT_FILE, OUTPUT_DIR, RAAN_CSV_FILE, RAAN_PLOT_FILE, TRACK_CSV_FILE,
};
use keplot::export::{write_raan_csv, write_track_csv};
use keplot::keplot_errors::KeplotError;
use keplot::logging::init_logging;
use keplot::pipeline::{OrbitConfig, OrbitPipeline};
use keplot::render::{render_orbit_plot, render_raan_plot, PlotStyle};

fn run() -> Result<(), KeplotError> {
    let config = OrbitConfig::builder()
        .eccentricity(DEFAULT_ECCENTRICITY)
        .tolerance(KEPLER_TOLERANCE)
        .time_range(DEFAULT_T_START, DEFAULT_T_END)
        .samples(DEFAULT_SAMPLES)
        .build()?;

    let pipeline = OrbitPipeline::new(config);
    let track = pipeline.run()?;
    let raan = pipeline.raan_series();

    let out = Utf8PathBuf::from(OUTPUT_DIR);
    let style = PlotStyle::default();
    render_orbit_plot(&track, &out.join(ORBIT_PLOT_FILE), &style)?;
    render_raan_plot(&raan, &out.join(RAAN_PLOT_FILE), &style)?;
    write_track_csv(&track, &out.join(TRACK_CSV_FILE))?;
    write_raan_csv(&raan, &out.join(RAAN_CSV_FILE))?;

    Ok(())
}

fn main() -> ExitCode {
    init_logging("info");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
