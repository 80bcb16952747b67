//! Result export: CSV pressure tables and JSON snapshots for downstream
//! tooling. The structural model that consumes them stays outside this
//! crate.

use std::fs::File;
use std::path::Path;

use crate::surcharge::{SamplePoint, SurchargeResult};

/// Error types for report writing
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Write the per-sample pressure table as CSV (SI units).
///
/// One row per sample, in sample order, zero rows included so the table
/// always covers the full surface.
pub fn write_pressure_csv(
    path: impl AsRef<Path>,
    samples: &[SamplePoint],
    result: &SurchargeResult,
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record([
        "id",
        "x_m",
        "y_m",
        "z_m",
        "tributary_area_m2",
        "normal_pa",
        "tangential_i_pa",
        "tangential_j_pa",
    ])?;

    for (sample, pressure) in samples.iter().zip(&result.pressures) {
        writer.write_record([
            sample.id.to_string(),
            format!("{:.6}", sample.position.x),
            format!("{:.6}", sample.position.y),
            format!("{:.6}", sample.position.z),
            format!("{:.6}", sample.tributary_area),
            format!("{:.6}", pressure.normal),
            format!("{:.6}", pressure.tangential_i),
            format!("{:.6}", pressure.tangential_j),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full result (pressures, ratio, shadow outline, warnings) as a
/// JSON snapshot.
pub fn write_result_json(
    path: impl AsRef<Path>,
    result: &SurchargeResult,
) -> Result<(), ReportError> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}
