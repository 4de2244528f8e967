//! `jellydoc generate` command implementation.

use std::path::PathBuf;

use clap::Args;
use jellydoc_config::{CliSettings, Config, DocFormat};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Type description model (overrides config).
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Directory receiving taglib.xml (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Doc comment format: html or markup (overrides config).
    #[arg(long)]
    doc_format: Option<DocFormat>,

    /// Path to configuration file (default: auto-discover jellydoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            model: self.model,
            output_dir: self.output_dir,
            doc_format: self.doc_format,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        run(&config, &Output::new())
    }
}

/// Extract tag libraries and write `taglib.xml`.
pub(super) fn run(config: &Config, output: &Output) -> Result<(), CliError> {
    let model = &config.source_resolved.model;
    let taglib_path = config.output_resolved.taglib_path();

    output.info(&format!("Model: {}", model.display()));
    output.info(&format!("Output: {}", taglib_path.display()));

    let taglib = jellydoc_extract::generate(model, &taglib_path, &config.extract)?;

    let tags: usize = taglib.libraries.iter().map(|l| l.tags.len()).sum();
    output.success(&format!(
        "Generated {} tag libraries ({tags} tags) to {}",
        taglib.libraries.len(),
        taglib_path.display()
    ));
    Ok(())
}
