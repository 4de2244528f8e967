//! Tag library records and the `taglib.xml` codec.
//!
//! The extractor produces a [`Taglib`] and persists it with
//! [`write_taglib`]; the reference report loads it back with
//! [`read_taglib`]. The document layout is:
//!
//! ```text
//! tags
//! └── library name= prefix= uri=
//!     ├── doc?
//!     └── tag className= name= no-content=?
//!         ├── doc?
//!         ├── attribute name= type= use=? deprecated=?
//!         │   └── doc?
//!         └── body?
//!             └── doc
//! ```
//!
//! A `doc` element holds well-formed HTML prose followed by one
//! `<NAMEtag>text</NAMEtag>` element per block annotation.

mod error;
mod model;
mod reader;
mod writer;

pub use error::TaglibError;
pub use model::{
    AttributeRecord, BLOCK_TAG_SUFFIX, BlockTag, Doc, Library, TagRecord, Taglib, fallback_uri,
    package_prefix,
};
pub use reader::{parse_taglib, read_taglib};
pub use writer::{to_xml, write_taglib};
