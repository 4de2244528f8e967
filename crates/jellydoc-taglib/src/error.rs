//! Error types for the taglib.xml codec.

use std::path::PathBuf;

/// Error reading or writing a tag library document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TaglibError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be opened.
    #[error("cannot read {}: {source}", path.display())]
    Open {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// XML parse or write error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Well-formed XML that does not describe tag libraries.
    #[error("malformed tag library document: {0}")]
    Malformed(String),
}
