//! Error types for tag library extraction.

use std::path::PathBuf;

use jellydoc_taglib::TaglibError;

/// Error extracting tag libraries from type descriptions.
///
/// Every variant aborts the whole generation run; nothing is written.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Type description file could not be read.
    #[error("cannot read type descriptions from {}: {source}", path.display())]
    Read {
        /// Model path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Type description JSON is invalid.
    #[error("invalid type descriptions: {0}")]
    Model(#[from] serde_json::Error),

    /// A doc comment could not be parsed.
    #[error("invalid doc comment on {entity}: {source}")]
    Comment {
        /// Qualified name of the documented entity.
        entity: String,
        /// Underlying error.
        source: DocCommentError,
    },

    /// A superclass chain loops back on itself.
    #[error("cyclic superclass chain through {0}")]
    CyclicHierarchy(String),

    /// Writing the tag library document failed.
    #[error(transparent)]
    Taglib(#[from] TaglibError),
}

/// Error parsing a doc comment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocCommentError {
    /// An inline tag has no closing brace.
    #[error("unterminated inline tag {{@{tag}}} at offset {offset}")]
    UnterminatedInlineTag {
        /// Inline tag name.
        tag: String,
        /// Byte offset of the opening brace in the comment body.
        offset: usize,
    },
}
