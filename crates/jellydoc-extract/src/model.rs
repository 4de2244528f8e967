//! Type description model.
//!
//! The introspection step (run by the host build) dumps packages, types,
//! annotations and method signatures as JSON. Only what the extractor reads
//! is modelled; unknown fields are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ExtractError;

/// Packages to document plus the types visible for hierarchy walking.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceModel {
    /// Packages whose types are candidates for tags.
    pub packages: Vec<PackageDesc>,
    /// Types outside the documented packages (base classes, interfaces).
    pub classpath: Vec<TypeDesc>,
}

impl SourceModel {
    /// Parse a model from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a model from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let json = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            packages = model.packages.len(),
            classpath = model.classpath.len(),
            "Loaded type descriptions"
        );
        Ok(model)
    }
}

/// A source package.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackageDesc {
    /// Fully qualified package name.
    pub name: String,
    /// Raw package doc comment.
    pub doc: Option<String>,
    /// Package annotations.
    pub annotations: Vec<AnnotationDesc>,
    /// Types declared directly in the package.
    pub types: Vec<TypeDesc>,
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A declared type.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TypeDesc {
    /// Fully qualified type name.
    pub name: String,
    pub kind: TypeKind,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    /// Qualified name of the direct superclass.
    pub superclass: Option<String>,
    /// Qualified names of directly implemented interfaces.
    pub interfaces: Vec<String>,
    pub annotations: Vec<AnnotationDesc>,
    /// Raw type doc comment.
    pub doc: Option<String>,
    /// Methods declared directly on the type, in source order.
    pub methods: Vec<MethodDesc>,
}

impl TypeDesc {
    /// Name after the last `.` of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit_once('.').map_or(&self.name, |(_, simple)| simple)
    }
}

/// A declared method.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MethodDesc {
    pub name: String,
    /// Modifier keywords (`public`, `static`, ...).
    pub modifiers: Vec<String>,
    pub parameters: Vec<ParameterDesc>,
    pub annotations: Vec<AnnotationDesc>,
    /// Raw method doc comment.
    pub doc: Option<String>,
}

impl MethodDesc {
    fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_public(&self) -> bool {
        self.has_modifier("public")
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static")
    }
}

/// A method parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParameterDesc {
    pub name: String,
    /// Declared type, textual (`java.lang.String`, `int`, `java.util.List<T>`).
    #[serde(rename = "type")]
    pub type_name: String,
}

/// An annotation instance with its explicitly set values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationDesc {
    /// Qualified annotation type name.
    #[serde(rename = "type")]
    pub type_name: String,
    pub values: BTreeMap<String, serde_json::Value>,
}

impl AnnotationDesc {
    /// Value of an annotation field as text.
    ///
    /// Strings are returned unquoted; other JSON values in their JSON form.
    pub fn value(&self, field: &str) -> Option<String> {
        self.values.get(field).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// First annotation of the given qualified type.
pub fn find_annotation<'a>(
    annotations: &'a [AnnotationDesc],
    type_name: &str,
) -> Option<&'a AnnotationDesc> {
    annotations.iter().find(|a| a.type_name == type_name)
}

/// Whether an annotation of the given qualified type is present.
pub fn has_annotation(annotations: &[AnnotationDesc], type_name: &str) -> bool {
    find_annotation(annotations, type_name).is_some()
}
