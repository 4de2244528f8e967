//! `jellydoc report` command implementation.

use std::path::PathBuf;

use clap::Args;
use jellydoc_config::{CliSettings, Config};
use jellydoc_report::publish_report;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the report command.
#[derive(Args)]
pub(crate) struct ReportArgs {
    /// Directory containing taglib.xml and schema files (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory receiving the report (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover jellydoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ReportArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            site_dir: self.site_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        run(&config, &Output::new())
    }
}

/// Render the reference report into the site directory.
pub(super) fn run(config: &Config, output: &Output) -> Result<(), CliError> {
    let taglib_path = config.output_resolved.taglib_path();
    let published = publish_report(
        &taglib_path,
        &config.output_resolved.dir,
        &config.output_resolved.site_dir,
    )?;

    match published {
        Some(report) => {
            for schema in &report.schemas {
                output.info(&format!("Copied {}", schema.display()));
            }
            output.success(&format!("Report written to {}", report.page.display()));
        }
        None => output.warning(&format!(
            "{} not found, skipping report",
            taglib_path.display()
        )),
    }
    Ok(())
}
