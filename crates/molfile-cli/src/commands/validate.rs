use crate::cli::ValidateArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molfile::workflows::progress::ProgressReporter;
use molfile::workflows::validate;
use tracing::info;

pub fn run(args: &ValidateArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Validating {} file(s)", args.paths.len());
    let report = validate::run(&args.paths, &config.read, &reporter);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(summary) => println!(
                "✓ {} ({}, {} atoms, {} bonds)",
                outcome.path.display(),
                summary.formula,
                summary.atom_count,
                summary.bond_count
            ),
            Err(e) => println!("✗ {}: {}", outcome.path.display(), e),
        }
    }

    if report.all_valid() {
        println!("All {} file(s) are valid.", report.outcomes.len());
        Ok(())
    } else {
        Err(CliError::Validation {
            invalid: report.invalid_count(),
            total: report.outcomes.len(),
        })
    }
}
