// Application layer: use cases and orchestration

pub mod export;
pub mod extractor;
pub mod planner;
pub mod report;

pub use export::{write_artifacts, Artifacts};
pub use extractor::{CoefficientMatrix, PlanResult, ScheduledBatch};
pub use planner::{PlanOutcome, Planner};

use crate::error::Result;
use crate::planning::load_from_path;
use std::path::Path;
use tracing::info;

/// Load a planning document, solve it and write the run artifacts.
///
/// Nothing is written unless the solve produced a usable solution.
pub fn run(document: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<PlanResult> {
    let loaded = load_from_path(document)?;
    let planner = Planner::for_config(&loaded.solver)?;
    let outcome = planner.plan(&loaded.dataset, loaded.solver.clone())?;
    let result = PlanResult::extract(&loaded.dataset, &outcome);

    let timestamp = chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();
    let artifacts = write_artifacts(output_dir.as_ref(), &result, &timestamp)?;
    info!(
        status = %result.status,
        profit = result.objective_value,
        report = %artifacts.report.display(),
        "planning run complete"
    );
    Ok(result)
}
