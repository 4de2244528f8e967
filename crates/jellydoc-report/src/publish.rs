//! Report publishing: render the page and attach schema artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use jellydoc_taglib::{TaglibError, read_taglib};

use crate::renderer::{ReferenceRenderer, TITLE};
use crate::sink::HtmlSink;

/// File name of the rendered report page.
pub const REPORT_FILENAME: &str = "jelly-taglib-ref.html";

/// Schema artifacts copied next to the report, one per library prefix.
const SCHEMA_PATTERN: &str = "taglib-*.xsd";

/// Error publishing the report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The tag library document could not be read.
    #[error(transparent)]
    Taglib(#[from] TaglibError),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid schema file pattern.
    #[error("invalid schema pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Files produced by a publish run.
#[derive(Debug)]
pub struct PublishedReport {
    /// The report page.
    pub page: PathBuf,
    /// Schema artifacts copied into the site directory, sorted.
    pub schemas: Vec<PathBuf>,
}

/// Render the reference report for `taglib_path` into `site_dir`.
///
/// Schema artifacts found in `output_dir` are copied alongside. Returns
/// `None` without touching `site_dir` when no tag library document exists.
pub fn publish_report(
    taglib_path: &Path,
    output_dir: &Path,
    site_dir: &Path,
) -> Result<Option<PublishedReport>, ReportError> {
    if !taglib_path.exists() {
        tracing::warn!(
            path = %taglib_path.display(),
            "Tag library document not found, skipping report"
        );
        return Ok(None);
    }

    let taglib = read_taglib(taglib_path)?;
    let mut sink = HtmlSink::new();
    ReferenceRenderer::new(&taglib).render(&mut sink);
    let html = sink.finish(TITLE);

    fs::create_dir_all(site_dir)?;
    let page = site_dir.join(REPORT_FILENAME);
    fs::write(&page, html)?;
    tracing::info!(path = %page.display(), "Wrote reference report");

    let schemas = copy_schemas(output_dir, site_dir)?;
    Ok(Some(PublishedReport { page, schemas }))
}

/// Copy `taglib-*.xsd` files from `from` into `to`.
fn copy_schemas(from: &Path, to: &Path) -> Result<Vec<PathBuf>, ReportError> {
    if !from.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = Pattern::new(SCHEMA_PATTERN)?;

    let mut sources = Vec::new();
    for entry in fs::read_dir(from)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.matches(name));
        if matches && path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();

    let mut copied = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = to.join(name);
        fs::copy(&source, &target)?;
        tracing::debug!(schema = %target.display(), "Copied schema");
        copied.push(target);
    }
    Ok(copied)
}
