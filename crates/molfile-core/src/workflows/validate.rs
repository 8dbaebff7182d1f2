use super::error::WorkflowError;
use super::inspect::{self, StructureSummary};
use super::progress::{Progress, ProgressReporter};
use crate::core::io::mol::ReadOptions;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<StructureSummary, WorkflowError>,
}

impl FileOutcome {
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes in the same order as the input paths.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub outcomes: Vec<FileOutcome>,
}

impl ValidationReport {
    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.outcomes.len() - self.valid_count()
    }

    pub fn all_valid(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_valid)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &WorkflowError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.path.as_path(), e)))
    }
}

fn validate_one(path: &Path, options: &ReadOptions) -> Result<StructureSummary, WorkflowError> {
    inspect::run(path, options).map(|(summary, _, _)| summary)
}

/// Reads every file in parallel and records whether it parses.
///
/// Files are independent: one failure never stops the others.
#[instrument(skip_all, name = "validate_workflow", fields(files = paths.len()))]
pub fn run(paths: &[PathBuf], options: &ReadOptions, reporter: &ProgressReporter) -> ValidationReport {
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    let outcomes: Vec<FileOutcome> = paths
        .par_iter()
        .map(|path| {
            let result = validate_one(path, options);
            if let Err(e) = &result {
                warn!(path = %path.display(), error = %e, "File failed validation");
                reporter.report(Progress::FileFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
            reporter.report(Progress::TaskIncrement);
            FileOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let report = ValidationReport { outcomes };
    info!(
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        "Validation finished"
    );
    report
}
