//! CLI command implementations.

mod generate;
mod report;
mod site;

pub(crate) use generate::GenerateArgs;
pub(crate) use report::ReportArgs;
pub(crate) use site::SiteArgs;
