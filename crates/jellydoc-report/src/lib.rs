//! Jelly tag library reference report.
//!
//! Reads a `taglib.xml` document and renders a browsable reference page:
//! a summary of libraries, then per library its documentation, a link to
//! its XML Schema, a tag summary and one section per tag listing its
//! attributes. Output goes through the [`ReportSink`] primitives;
//! [`HtmlSink`] turns them into a standalone HTML page.

mod publish;
mod renderer;
mod sink;

pub use publish::{PublishedReport, REPORT_FILENAME, ReportError, publish_report};
pub use renderer::{HIDDEN_ATTRIBUTES, ReferenceRenderer, TITLE};
pub use sink::{HtmlSink, ReportSink, anchor_id};
