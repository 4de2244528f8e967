//! Metadata extractor: type descriptions to tag library records.

use jellydoc_config::{DocFormat, ExtractConfig};
use jellydoc_markup::{MarkupRenderer, sanitize_html};
use jellydoc_taglib::{AttributeRecord, Doc, Library, TagRecord, Taglib};

use crate::comment::parse_comment;
use crate::error::ExtractError;
use crate::hierarchy::TypeHierarchy;
use crate::model::{
    MethodDesc, PackageDesc, SourceModel, TypeDesc, TypeKind, find_annotation, has_annotation,
};
use crate::naming::{attribute_name, tag_name};

/// Builds tag library records from a source model.
pub struct Extractor<'a> {
    model: &'a SourceModel,
    hierarchy: TypeHierarchy<'a>,
    config: &'a ExtractConfig,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over a model.
    pub fn new(model: &'a SourceModel, config: &'a ExtractConfig) -> Self {
        Self {
            model,
            hierarchy: TypeHierarchy::new(model),
            config,
        }
    }

    /// Extract one library per package that declares a concrete tag.
    ///
    /// Libraries keep package order, tags keep declaration order.
    pub fn extract(&self) -> Result<Taglib, ExtractError> {
        let mut libraries = Vec::new();
        for package in &self.model.packages {
            if let Some(library) = self.library(package)? {
                libraries.push(library);
            }
        }
        Ok(Taglib { libraries })
    }

    fn library(&self, package: &'a PackageDesc) -> Result<Option<Library>, ExtractError> {
        tracing::info!(package = %package.name, "Processing package");

        let mut tags = Vec::new();
        for ty in &package.types {
            if ty.kind != TypeKind::Class || ty.is_abstract {
                continue;
            }
            if self.hierarchy.is_tag(ty, &self.config.tag_interface)? {
                tags.push(self.tag(ty)?);
            }
        }
        if tags.is_empty() {
            tracing::debug!(package = %package.name, "No tags found, skipping package");
            return Ok(None);
        }

        let uri = find_annotation(&package.annotations, &self.config.uri_annotation)
            .and_then(|annotation| annotation.value("value"));
        let mut library = Library::for_package(&package.name, uri);
        library.doc = self.doc(package.doc.as_deref(), &package.name)?;
        library.tags = tags;
        Ok(Some(library))
    }

    fn tag(&self, ty: &'a TypeDesc) -> Result<TagRecord, ExtractError> {
        let name = tag_name(ty.simple_name());
        tracing::debug!(tag = %name, class = %ty.name, "Processing tag");

        let mut attributes = Vec::new();
        for owner in self.hierarchy.superclass_chain(ty)? {
            for method in &owner.methods {
                if let Some(attribute) = self.attribute(owner, method)? {
                    attributes.push(attribute);
                }
            }
        }

        Ok(TagRecord {
            class_name: ty.simple_name().to_owned(),
            name,
            no_content: has_annotation(&ty.annotations, &self.config.no_content_annotation),
            doc: self.doc(ty.doc.as_deref(), &ty.name)?,
            attributes,
            body: None,
        })
    }

    /// Attribute for an eligible setter: public, non-static, one parameter.
    fn attribute(
        &self,
        owner: &TypeDesc,
        method: &MethodDesc,
    ) -> Result<Option<AttributeRecord>, ExtractError> {
        if !method.is_public() || method.is_static() {
            return Ok(None);
        }
        let [parameter] = method.parameters.as_slice() else {
            return Ok(None);
        };
        let Some(name) = attribute_name(&method.name) else {
            return Ok(None);
        };

        let entity = format!("{}#{}", owner.name, method.name);
        Ok(Some(AttributeRecord {
            name,
            type_name: parameter.type_name.clone(),
            required: has_annotation(&method.annotations, &self.config.required_annotation),
            deprecated: has_annotation(&method.annotations, &self.config.deprecated_annotation),
            doc: self.doc(method.doc.as_deref(), &entity)?,
        }))
    }

    /// Doc for an entity; `None` when it has no comment.
    fn doc(&self, raw: Option<&str>, entity: &str) -> Result<Option<Doc>, ExtractError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let comment = parse_comment(raw).map_err(|source| ExtractError::Comment {
            entity: entity.to_owned(),
            source,
        })?;
        let html = match self.config.doc_format {
            DocFormat::Html => comment.body,
            DocFormat::Markup => MarkupRenderer::new().render(&comment.body),
        };
        Ok(Some(Doc {
            content: sanitize_html(&html),
            block_tags: comment.block_tags,
        }))
    }
}
