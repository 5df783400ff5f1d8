//! Command line interface for the mod deployer.
//!
//! Parses arguments, builds the deploy settings, runs the synchronization on a
//! blocking worker and prints the outcome.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::deployer::{DeployReport, SkipReason};
use crate::error::{CliError, DeployError, Result};

/// Exit code when every mod was deployed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when the deploy ran but some items failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Runs the deploy described by already parsed arguments.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| DeployError::Cli(CliError::InvalidArguments { reason }))?;
    let runtime_config = RuntimeConfig::from(&args);

    let settings = args.to_settings()?;
    let deployer = settings.deployer()?;
    let sources = settings.sources().paths()?;

    runtime_config.section(&format!(
        "Deploying {} source(s) into {}",
        sources.len(),
        settings.target_dir().display()
    ))?;
    for source in &sources {
        runtime_config.verbose_println(&source.display().to_string())?;
    }

    let dry_run = args.dry_run;
    let report = tokio::task::spawn_blocking(move || {
        if dry_run {
            deployer.plan(&sources).into_report()
        } else {
            deployer.deploy(&sources)
        }
    })
    .await
    .map_err(|e| {
        DeployError::Cli(CliError::ExecutionFailed {
            command: "deploy".to_string(),
            reason: format!("Task panicked: {}", e),
        })
    })?;

    print_report(&runtime_config, &report)?;

    if let Some(path) = &args.report {
        report.write_json(path)?;
        runtime_config.verbose_println(&format!("Report written to {}", path.display()))?;
    }

    Ok(if report.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_PARTIAL_FAILURE
    })
}

fn print_report(runtime_config: &RuntimeConfig, report: &DeployReport) -> std::io::Result<()> {
    let verb = if report.dry_run { "Would remove" } else { "Removed" };
    for removed in &report.removed {
        runtime_config.progress(&format!(
            "{} {} ({})",
            verb,
            removed.path.display(),
            removed.name
        ))?;
    }

    for skipped in &report.skipped {
        let reason = match &skipped.reason {
            SkipReason::Missing => "does not exist".to_string(),
            SkipReason::NotAMod => "has no extension.json".to_string(),
            SkipReason::InvalidManifest(message) => format!("unreadable manifest: {message}"),
        };
        match skipped.reason {
            SkipReason::InvalidManifest(_) => {
                runtime_config.warn(&format!("Skipped {}: {}", skipped.path.display(), reason))?
            }
            _ => runtime_config
                .verbose_println(&format!("Skipped {}: {}", skipped.path.display(), reason))?,
        }
    }

    let verb = if report.dry_run { "Would deploy" } else { "Deployed" };
    for deployed in &report.deployed {
        runtime_config.success(&format!(
            "{} {} -> {}",
            verb,
            deployed.name,
            deployed.destination.display()
        ))?;
        if !report.dry_run {
            runtime_config.indent(&format!("{} bytes, sha256 {}", deployed.size, deployed.sha256))?;
        }
    }

    for failure in &report.failures {
        runtime_config.output().error(&format!(
            "{:?} failed for {}: {}",
            failure.stage,
            failure.path.display(),
            failure.message
        ))?;
    }

    if report.deployed.is_empty() && report.failures.is_empty() {
        runtime_config.warn("No mods deployed")?;
    }
    Ok(())
}
