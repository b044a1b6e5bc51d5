// Run artifacts: coefficient matrix, report text and the flat value row.

use super::extractor::{CoefficientMatrix, PlanResult};
use super::report;
use crate::error::{PlanningError, Result};
use csv::Writer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MODEL_SUMMARY_FILE: &str = "model_summary.csv";
pub const REPORT_FILE: &str = "optimal_result.txt";
pub const VALUES_FILE: &str = "optimal_values.csv";

/// Paths of the files written by [`write_artifacts`].
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub model_summary: PathBuf,
    pub report: PathBuf,
    pub values: PathBuf,
}

/// One row per constraint plus the objective; bounds in the last two columns.
pub fn write_matrix<W: io::Write>(out: W, matrix: &CoefficientMatrix) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    let mut header = Vec::with_capacity(matrix.columns.len() + 3);
    header.push(String::new());
    header.extend(matrix.columns.iter().cloned());
    header.push("L_Bound".to_string());
    header.push("U_Bound".to_string());
    wtr.write_record(&header)?;

    for row in &matrix.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.name.clone());
        record.extend(row.coefficients.iter().map(|c| c.to_string()));
        record.push(row.lower.to_string());
        record.push(row.upper.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Variable names as the header, their values as the single data row.
pub fn write_values<W: io::Write>(out: W, result: &PlanResult) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(result.variables.iter().map(|v| v.name.as_str()))?;
    wtr.write_record(result.variables.iter().map(|v| v.value.to_string()))?;
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PlanningError + '_ {
    move |source| PlanningError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(target.file_name().unwrap_or_default());
    name.push(".tmp");
    target.with_file_name(name)
}

/// Drop staged files and any artifact already moved into place.
fn discard(paths: &[&Path]) {
    for path in paths {
        if path.is_file() {
            if let Err(err) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %err, "could not remove partial artifact");
            }
        }
    }
}

/// Write every artifact into `output_dir`, creating it when missing.
///
/// All payloads are rendered and staged before any target is replaced; if
/// any step fails, none of this run's files are left behind.
pub fn write_artifacts(output_dir: &Path, result: &PlanResult, timestamp: &str) -> Result<Artifacts> {
    fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;

    let artifacts = Artifacts {
        model_summary: output_dir.join(MODEL_SUMMARY_FILE),
        report: output_dir.join(REPORT_FILE),
        values: output_dir.join(VALUES_FILE),
    };

    let mut matrix = Vec::new();
    write_matrix(&mut matrix, &result.matrix)?;
    let mut values = Vec::new();
    write_values(&mut values, result)?;
    let payloads = [
        (&artifacts.model_summary, matrix),
        (&artifacts.report, report::render(result, timestamp).into_bytes()),
        (&artifacts.values, values),
    ];

    let staged: Vec<(PathBuf, &PathBuf)> = payloads
        .iter()
        .map(|(target, _)| (staging_path(target), *target))
        .collect();
    let staged_paths: Vec<&Path> = staged.iter().map(|(tmp, _)| tmp.as_path()).collect();

    for ((tmp, _), (_, bytes)) in staged.iter().zip(&payloads) {
        if let Err(source) = fs::write(tmp, bytes) {
            discard(&staged_paths);
            return Err(io_error(tmp)(source));
        }
    }

    for (done, (tmp, target)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, target) {
            let moved = staged[..done].iter().map(|(_, target)| target.as_path());
            discard(&staged_paths.iter().copied().chain(moved).collect::<Vec<_>>());
            return Err(io_error(target)(source));
        }
    }

    info!(dir = %output_dir.display(), "artifacts written");
    Ok(artifacts)
}
