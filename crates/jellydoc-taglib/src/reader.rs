//! `taglib.xml` parser.
//!
//! The document is first read into a generic [`Node`] tree and then mapped
//! onto the record types. Whitespace between structural elements is
//! ignored; text inside `doc` is kept as written.

use std::path::Path;

use jellydoc_markup::{Element, Node, TreeBuilder, text_content};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::TaglibError;
use crate::model::{AttributeRecord, BLOCK_TAG_SUFFIX, BlockTag, Doc, Library, TagRecord, Taglib};

/// Read and parse a tag library document from disk.
pub fn read_taglib(path: &Path) -> Result<Taglib, TaglibError> {
    let xml = std::fs::read_to_string(path).map_err(|source| TaglibError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let taglib = parse_taglib(&xml)?;
    tracing::debug!(
        path = %path.display(),
        libraries = taglib.libraries.len(),
        "Read tag library document"
    );
    Ok(taglib)
}

/// Parse a tag library document.
pub fn parse_taglib(xml: &str) -> Result<Taglib, TaglibError> {
    let nodes = parse_tree(xml)?;
    let mut roots = nodes.iter().filter_map(as_element);
    let root = roots
        .next()
        .ok_or_else(|| TaglibError::Malformed("document has no root element".to_owned()))?;
    if root.name != "tags" {
        return Err(TaglibError::Malformed(format!(
            "expected root element <tags>, found <{}>",
            root.name
        )));
    }

    let libraries = root
        .elements()
        .filter(|e| e.name == "library")
        .map(library)
        .collect::<Result<_, _>>()?;
    Ok(Taglib { libraries })
}

fn parse_tree(xml: &str) -> Result<Vec<Node>, TaglibError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let (name, attrs) = decode_start(&reader, &e)?;
                builder.start(name, attrs);
            }
            Event::Empty(e) => {
                let (name, attrs) = decode_start(&reader, &e)?;
                builder.start(name, attrs);
                builder.end();
            }
            Event::End(_) => {
                builder.end();
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                builder.text(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                builder.text(&decode_entity(&entity));
            }
            Event::CData(e) => {
                builder.text(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if builder.depth() > 0 {
        return Err(TaglibError::Malformed(
            "unexpected end of document".to_owned(),
        ));
    }
    Ok(builder.finish())
}

fn decode_start(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<(String, Vec<(String, String)>), TaglibError> {
    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.push((key, value));
    }
    Ok((name, attrs))
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

fn as_element(node: &Node) -> Option<&Element> {
    match node {
        Node::Element(e) => Some(e),
        Node::Text(_) => None,
    }
}

fn required_attr<'a>(element: &'a Element, key: &str) -> Result<&'a str, TaglibError> {
    element.attr(key).ok_or_else(|| {
        TaglibError::Malformed(format!(
            "<{}> is missing required attribute '{key}'",
            element.name
        ))
    })
}

fn flag(element: &Element, key: &str, expected: &str) -> bool {
    element.attr(key) == Some(expected)
}

fn library(element: &Element) -> Result<Library, TaglibError> {
    let tags = element
        .elements()
        .filter(|e| e.name == "tag")
        .map(tag)
        .collect::<Result<_, _>>()?;
    Ok(Library {
        name: required_attr(element, "name")?.to_owned(),
        prefix: required_attr(element, "prefix")?.to_owned(),
        uri: required_attr(element, "uri")?.to_owned(),
        doc: element.element("doc").map(doc),
        tags,
    })
}

fn tag(element: &Element) -> Result<TagRecord, TaglibError> {
    let attributes = element
        .elements()
        .filter(|e| e.name == "attribute")
        .map(attribute)
        .collect::<Result<_, _>>()?;
    let body = element
        .element("body")
        .map(|body| body.element("doc").map(doc).unwrap_or_default());
    Ok(TagRecord {
        class_name: required_attr(element, "className")?.to_owned(),
        name: required_attr(element, "name")?.to_owned(),
        no_content: flag(element, "no-content", "true"),
        doc: element.element("doc").map(doc),
        attributes,
        body,
    })
}

fn attribute(element: &Element) -> Result<AttributeRecord, TaglibError> {
    Ok(AttributeRecord {
        name: required_attr(element, "name")?.to_owned(),
        type_name: element.attr("type").unwrap_or_default().to_owned(),
        required: flag(element, "use", "required"),
        deprecated: flag(element, "deprecated", "true"),
        doc: element.element("doc").map(doc),
    })
}

/// Split a `doc` element into prose and block annotations.
///
/// A child element whose name ends in `tag` and that holds text only is a
/// block annotation. Anything else is prose.
fn doc(element: &Element) -> Doc {
    let mut result = Doc::default();
    for child in &element.children {
        if let Node::Element(e) = child
            && let Some(name) = block_tag_name(e)
        {
            result
                .block_tags
                .push(BlockTag::new(name, text_content(&e.children)));
            continue;
        }
        result.content.push(child.clone());
    }
    result
}

fn block_tag_name(element: &Element) -> Option<&str> {
    let name = element.name.strip_suffix(BLOCK_TAG_SUFFIX)?;
    let text_only = element
        .children
        .iter()
        .all(|child| matches!(child, Node::Text(_)));
    (!name.is_empty() && text_only).then_some(name)
}
