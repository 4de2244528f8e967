//! Tag library records.
//!
//! These are read-only projections computed once per generation run. Names
//! are unique within their parent by convention only; nothing here rejects
//! duplicates.

use jellydoc_markup::Node;

/// Root of a tag library document (`<tags>`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Taglib {
    /// Libraries in generation order.
    pub libraries: Vec<Library>,
}

/// One tag library, derived from one source package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    /// Fully qualified package name.
    pub name: String,
    /// Namespace prefix (last package name segment).
    pub prefix: String,
    /// Namespace URI.
    pub uri: String,
    /// Package documentation.
    pub doc: Option<Doc>,
    /// Tags declared in the package.
    pub tags: Vec<TagRecord>,
}

impl Library {
    /// Create a library for a package, deriving its prefix and falling back
    /// to `jelly:<prefix>` when no URI was declared.
    pub fn for_package(package: &str, declared_uri: Option<String>) -> Self {
        let prefix = package_prefix(package).to_owned();
        let uri = declared_uri.unwrap_or_else(|| fallback_uri(&prefix));
        Self {
            name: package.to_owned(),
            prefix,
            uri,
            doc: None,
            tags: Vec::new(),
        }
    }
}

/// Last segment of a package name, or the whole name if it has no `.`.
pub fn package_prefix(package: &str) -> &str {
    package.rsplit_once('.').map_or(package, |(_, last)| last)
}

/// Namespace URI used when a package declares none.
pub fn fallback_uri(prefix: &str) -> String {
    format!("jelly:{prefix}")
}

/// One tag, derived from one non-abstract tag class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagRecord {
    /// Simple class name.
    pub class_name: String,
    /// Tag name.
    pub name: String,
    /// Whether the tag accepts no nested content.
    pub no_content: bool,
    /// Tag documentation.
    pub doc: Option<Doc>,
    /// Attributes: the class's own setters first, then each ancestor's.
    pub attributes: Vec<AttributeRecord>,
    /// Documentation of the accepted body content.
    pub body: Option<Doc>,
}

/// One attribute, derived from one setter method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    /// Attribute name.
    pub name: String,
    /// Declared parameter type, textual.
    pub type_name: String,
    /// Whether the attribute must be set.
    pub required: bool,
    /// Whether the attribute is deprecated.
    pub deprecated: bool,
    /// Attribute documentation.
    pub doc: Option<Doc>,
}

/// Documentation attached to a library, tag, attribute or body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Doc {
    /// Rendered prose as a well-formed element tree.
    pub content: Vec<Node>,
    /// Custom block annotations (`@author`, `@since`, ...).
    pub block_tags: Vec<BlockTag>,
}

impl Doc {
    /// Doc with prose only.
    pub fn from_content(content: Vec<Node>) -> Self {
        Self {
            content,
            block_tags: Vec::new(),
        }
    }
}

/// A named block annotation, serialized as `<NAMEtag>text</NAMEtag>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTag {
    /// Annotation name without the leading `@`.
    pub name: String,
    /// Annotation text.
    pub text: String,
}

/// Suffix appended to block annotation names to form element names.
pub const BLOCK_TAG_SUFFIX: &str = "tag";

impl BlockTag {
    /// Create a block tag.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Element name used in `taglib.xml`.
    pub fn element_name(&self) -> String {
        format!("{}{BLOCK_TAG_SUFFIX}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_prefix() {
        assert_eq!(package_prefix("com.example.tags"), "tags");
        assert_eq!(package_prefix("tags"), "tags");
    }

    #[test]
    fn test_library_uri_fallback() {
        let library = Library::for_package("com.example.tags", None);
        assert_eq!(library.prefix, "tags");
        assert_eq!(library.uri, "jelly:tags");
    }

    #[test]
    fn test_library_declared_uri() {
        let library = Library::for_package("com.example.tags", Some("urn:test".to_owned()));
        assert_eq!(library.uri, "urn:test");
        assert_eq!(library.name, "com.example.tags");
    }

    #[test]
    fn test_block_tag_element_name() {
        assert_eq!(BlockTag::new("author", "someone").element_name(), "authortag");
    }
}
