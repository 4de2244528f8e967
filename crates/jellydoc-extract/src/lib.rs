//! Tag library extraction for jellydoc.
//!
//! Reads the type descriptions dumped by the introspection step, finds the
//! classes implementing the tag interface (directly or through a
//! superclass), and derives one [`Library`](jellydoc_taglib::Library) per
//! package that declares at least one concrete tag. Attributes come from
//! public single-argument setters, collected from the tag class and then
//! each superclass in turn.
//!
//! Doc comments are split into prose and block annotations by
//! [`parse_comment`]. Prose is rendered according to the configured
//! [`DocFormat`](jellydoc_config::DocFormat) and re-emitted as a well-formed
//! tree.
//!
//! # Example
//!
//! ```
//! use jellydoc_config::ExtractConfig;
//! use jellydoc_extract::{Extractor, SourceModel};
//!
//! let model = SourceModel::from_json(r#"{
//!     "packages": [{
//!         "name": "com.example.tags",
//!         "types": [{
//!             "name": "com.example.tags.FooTag",
//!             "interfaces": ["org.apache.commons.jelly.Tag"]
//!         }]
//!     }]
//! }"#)?;
//! let config = ExtractConfig::default();
//! let taglib = Extractor::new(&model, &config).extract()?;
//! assert_eq!(taglib.libraries[0].uri, "jelly:tags");
//! assert_eq!(taglib.libraries[0].tags[0].name, "foo");
//! # Ok::<(), jellydoc_extract::ExtractError>(())
//! ```

mod comment;
mod error;
mod extractor;
mod hierarchy;
mod model;
mod naming;

use std::path::Path;

use jellydoc_config::ExtractConfig;
use jellydoc_taglib::{Taglib, write_taglib};

pub use comment::{DocComment, parse_comment};
pub use error::{DocCommentError, ExtractError};
pub use extractor::Extractor;
pub use hierarchy::TypeHierarchy;
pub use model::{
    AnnotationDesc, MethodDesc, PackageDesc, ParameterDesc, SourceModel, TypeDesc, TypeKind,
};
pub use naming::{RESERVED_PROPERTIES, attribute_name, decapitalize, tag_name};

/// Run a full generation: load the model, extract, write `taglib.xml`.
///
/// Nothing is written unless extraction succeeds for every package.
pub fn generate(
    model_path: &Path,
    taglib_path: &Path,
    config: &ExtractConfig,
) -> Result<Taglib, ExtractError> {
    let model = SourceModel::load(model_path)?;
    let taglib = Extractor::new(&model, config).extract()?;
    write_taglib(&taglib, taglib_path)?;

    let tags: usize = taglib.libraries.iter().map(|l| l.tags.len()).sum();
    tracing::info!(
        libraries = taglib.libraries.len(),
        tags,
        "Generated tag library document"
    );
    Ok(taglib)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.json");
        std::fs::write(
            &model_path,
            r#"{"packages": [{"name": "com.example.tags", "types": [
                {"name": "com.example.tags.FooTag", "interfaces": ["org.apache.commons.jelly.Tag"]}
            ]}]}"#,
        )
        .unwrap();
        let taglib_path = dir.path().join("out/taglib.xml");

        let taglib = generate(&model_path, &taglib_path, &ExtractConfig::default()).unwrap();

        assert_eq!(taglib.libraries.len(), 1);
        let xml = std::fs::read_to_string(&taglib_path).unwrap();
        assert!(xml.contains(r#"<tag className="FooTag" name="foo"/>"#));
    }

    #[test]
    fn test_generate_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.json");
        std::fs::write(
            &model_path,
            r#"{"packages": [{"name": "p", "types": [
                {"name": "p.ATag", "interfaces": ["org.apache.commons.jelly.Tag"], "doc": "{@link"}
            ]}]}"#,
        )
        .unwrap();
        let taglib_path = dir.path().join("taglib.xml");

        let err = generate(&model_path, &taglib_path, &ExtractConfig::default()).unwrap_err();

        assert!(matches!(err, ExtractError::Comment { .. }));
        assert!(!taglib_path.exists());
    }
}
