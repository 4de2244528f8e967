//! `taglib.xml` serializer.
//!
//! The whole document is built in memory first and then persisted through a
//! temporary file in the target directory, so an interrupted run never
//! leaves a truncated document behind.

use std::io::Write as _;
use std::path::Path;

use jellydoc_markup::Node;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::TaglibError;
use crate::model::{AttributeRecord, Doc, Library, TagRecord, Taglib};

/// Serialize a tag library document to an XML string.
pub fn to_xml(taglib: &Taglib) -> Result<String, TaglibError> {
    let mut out = TaglibWriter::new();
    out.declaration()?;
    out.start("tags", &[])?;
    for library in &taglib.libraries {
        out.library(library)?;
    }
    out.end("tags")?;
    Ok(out.finish())
}

/// Serialize a tag library document and persist it at `path`.
///
/// Missing parent directories are created. The previous document, if any,
/// is replaced only once the new one has been fully written.
pub fn write_taglib(taglib: &Taglib, path: &Path) -> Result<(), TaglibError> {
    let xml = to_xml(taglib)?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(xml.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::info!(
        path = %path.display(),
        libraries = taglib.libraries.len(),
        "Wrote tag library document"
    );
    Ok(())
}

struct TaglibWriter {
    writer: Writer<Vec<u8>>,
}

impl TaglibWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::with_capacity(8192)),
        }
    }

    fn finish(self) -> String {
        // Everything written went through &str, so the buffer is valid UTF-8.
        String::from_utf8_lossy(&self.writer.into_inner()).into_owned()
    }

    fn declaration(&mut self) -> Result<(), TaglibError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), TaglibError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), TaglibError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), TaglibError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), TaglibError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn library(&mut self, library: &Library) -> Result<(), TaglibError> {
        self.start(
            "library",
            &[
                ("name", library.name.as_str()),
                ("prefix", library.prefix.as_str()),
                ("uri", library.uri.as_str()),
            ],
        )?;
        if let Some(doc) = &library.doc {
            self.doc(doc)?;
        }
        for tag in &library.tags {
            self.tag(tag)?;
        }
        self.end("library")
    }

    fn tag(&mut self, tag: &TagRecord) -> Result<(), TaglibError> {
        let mut attrs = vec![
            ("className", tag.class_name.as_str()),
            ("name", tag.name.as_str()),
        ];
        if tag.no_content {
            attrs.push(("no-content", "true"));
        }

        if tag.doc.is_none() && tag.attributes.is_empty() && tag.body.is_none() {
            return self.empty("tag", &attrs);
        }

        self.start("tag", &attrs)?;
        if let Some(doc) = &tag.doc {
            self.doc(doc)?;
        }
        for attribute in &tag.attributes {
            self.attribute(attribute)?;
        }
        if let Some(body) = &tag.body {
            self.start("body", &[])?;
            self.doc(body)?;
            self.end("body")?;
        }
        self.end("tag")
    }

    fn attribute(&mut self, attribute: &AttributeRecord) -> Result<(), TaglibError> {
        let mut attrs = vec![
            ("name", attribute.name.as_str()),
            ("type", attribute.type_name.as_str()),
        ];
        if attribute.required {
            attrs.push(("use", "required"));
        }
        if attribute.deprecated {
            attrs.push(("deprecated", "true"));
        }

        match &attribute.doc {
            None => self.empty("attribute", &attrs),
            Some(doc) => {
                self.start("attribute", &attrs)?;
                self.doc(doc)?;
                self.end("attribute")
            }
        }
    }

    fn doc(&mut self, doc: &Doc) -> Result<(), TaglibError> {
        if doc.content.is_empty() && doc.block_tags.is_empty() {
            return self.empty("doc", &[]);
        }
        self.start("doc", &[])?;
        for node in &doc.content {
            self.node(node)?;
        }
        for block_tag in &doc.block_tags {
            let name = block_tag.element_name();
            self.start(&name, &[])?;
            self.text(&block_tag.text)?;
            self.end(&name)?;
        }
        self.end("doc")
    }

    fn node(&mut self, node: &Node) -> Result<(), TaglibError> {
        match node {
            Node::Text(text) => self.text(text),
            Node::Element(element) => {
                let attrs: Vec<(&str, &str)> = element
                    .attrs
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                if element.children.is_empty() {
                    return self.empty(&element.name, &attrs);
                }
                self.start(&element.name, &attrs)?;
                for child in &element.children {
                    self.node(child)?;
                }
                self.end(&element.name)
            }
        }
    }
}
