//! `jellydoc site` command implementation.

use std::path::PathBuf;

use clap::Args;
use jellydoc_config::{CliSettings, Config, DocFormat};

use super::{generate, report};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the site command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Type description model (overrides config).
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Directory receiving taglib.xml (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory receiving the report (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Doc comment format: html or markup (overrides config).
    #[arg(long)]
    doc_format: Option<DocFormat>,

    /// Path to configuration file (default: auto-discover jellydoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SiteArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            model: self.model,
            output_dir: self.output_dir,
            site_dir: self.site_dir,
            doc_format: self.doc_format,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        generate::run(&config, &output)?;
        report::run(&config, &output)
    }
}
