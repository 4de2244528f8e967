//! CLI error types.

use jellydoc_config::ConfigError;
use jellydoc_extract::ExtractError;
use jellydoc_report::ReportError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Report(#[from] ReportError),
}
