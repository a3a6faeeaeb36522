//! CSV export of the computed series, one row per sample.
use camino::Utf8Path;
use serde::Serialize;

use crate::keplot_errors::KeplotError;
use crate::pipeline::{OrbitRow, OrbitTrack};
use crate::raan::RaanSample;

const TRACK_HEADER: [&str; 8] = [
    "time",
    "mean_anomaly",
    "eccentric_anomaly",
    "iterations",
    "radius",
    "true_anomaly",
    "x",
    "y",
];

const RAAN_HEADER: [&str; 2] = ["time", "raan_deg"];

/// The header is written up front so an empty series still yields a valid table.
fn write_rows<T, I>(path: &Utf8Path, header: &[&str], rows: I) -> Result<usize, KeplotError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    tracing::info!(%path, rows = count, "table written");
    Ok(count)
}

/// Write the solved points of `track` with header
/// `time,mean_anomaly,eccentric_anomaly,iterations,radius,true_anomaly,x,y`.
///
/// Returns the number of data rows written.
pub fn write_track_csv(track: &OrbitTrack, path: &Utf8Path) -> Result<usize, KeplotError> {
    write_rows(path, &TRACK_HEADER, track.points.iter().map(OrbitRow::from))
}

/// Write the RAAN series with header `time,raan_deg`.
pub fn write_raan_csv(samples: &[RaanSample], path: &Utf8Path) -> Result<usize, KeplotError> {
    write_rows(path, &RAAN_HEADER, samples.iter())
}

#[cfg(test)]
mod export_test {
    use super::*;
    use crate::pipeline::OrbitTrack;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_empty_series_keep_header() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

        let track = OrbitTrack {
            eccentricity: 0.5,
            points: Vec::new(),
            failures: Vec::new(),
        };
        let track_csv = dir.join("track.csv");
        assert_eq!(write_track_csv(&track, &track_csv).unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(&track_csv).unwrap(),
            "time,mean_anomaly,eccentric_anomaly,iterations,radius,true_anomaly,x,y\n"
        );

        let raan_csv = dir.join("raan.csv");
        assert_eq!(write_raan_csv(&[], &raan_csv).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&raan_csv).unwrap(), "time,raan_deg\n");
    }

    #[test]
    fn test_rows_follow_header() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("raan.csv")).unwrap();
        let samples = [RaanSample {
            time: 1.0,
            raan: 30.01,
        }];
        assert_eq!(write_raan_csv(&samples, &path).unwrap(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "time,raan_deg\n1.0,30.01\n"
        );
    }
}
