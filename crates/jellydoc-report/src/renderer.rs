//! Reference report for a tag library document.

use jellydoc_markup::{MarkupRenderer, escape_html};
use jellydoc_taglib::{AttributeRecord, Doc, Library, TagRecord, Taglib};

use crate::sink::{ReportSink, anchor_id};

/// Report title.
pub const TITLE: &str = "Jelly Taglib references";

/// Attributes every tag inherits for text handling; never listed.
pub const HIDDEN_ATTRIBUTES: &[&str] = &["escapeText", "trim"];

const NO_CONTENT_TEXT: &str = "This tag does not accept any child elements/text.";

/// Renders a [`Taglib`] through a [`ReportSink`].
///
/// Libraries, tags and attributes are listed by ascending name; entries
/// with equal names keep document order.
pub struct ReferenceRenderer<'a> {
    taglib: &'a Taglib,
}

impl<'a> ReferenceRenderer<'a> {
    #[must_use]
    pub fn new(taglib: &'a Taglib) -> Self {
        Self { taglib }
    }

    /// Write the report body.
    pub fn render(&self, sink: &mut impl ReportSink) {
        let libraries = sorted_by_name(&self.taglib.libraries, |l| &l.name);

        sink.paragraph("The following Jelly tag libraries are defined in this project.");

        if libraries.len() > 1 {
            sink.table_start();
            sink.table_header(&["Namespace URI", "Description"]);
            for library in &libraries {
                sink.row_start();
                sink.raw_cell(&link(&library.prefix, &library.uri));
                sink.raw_cell(&doc_html(library.doc.as_ref()));
                sink.row_end();
            }
            sink.table_end();
        }

        for library in libraries {
            Self::render_library(sink, library);
        }
    }

    fn render_library(sink: &mut impl ReportSink, library: &Library) {
        let prefix = &library.prefix;
        let tags = sorted_by_name(&library.tags, |t| &t.name);

        sink.anchor(prefix);
        sink.section_start(&library.uri);
        sink.raw_text(&doc_html(library.doc.as_ref()));
        sink.raw_paragraph(&format!(
            "This tag library is <a href='taglib-{}.xsd'>also available as an XML Schema</a>",
            escape_html(prefix)
        ));

        sink.table_start();
        sink.table_header(&["Tag Name", "Description"]);
        for tag in &tags {
            sink.row_start();
            sink.raw_cell(&link(&format!("{prefix}:{}", tag.name), &tag.name));
            sink.raw_cell(&doc_html(tag.doc.as_ref()));
            sink.row_end();
        }
        sink.table_end();

        for tag in tags {
            Self::render_tag(sink, prefix, tag);
        }
        sink.section_end();
    }

    fn render_tag(sink: &mut impl ReportSink, prefix: &str, tag: &TagRecord) {
        sink.anchor(&format!("{prefix}:{}", tag.name));
        sink.section_start(&tag.name);
        sink.raw_text(&doc_html(tag.doc.as_ref()));

        let attributes: Vec<&AttributeRecord> = sorted_by_name(&tag.attributes, |a| &a.name)
            .into_iter()
            .filter(|a| !is_hidden(a))
            .collect();
        if !attributes.is_empty() {
            sink.table_start();
            sink.table_header(&["Attribute Name", "Type", "Description"]);
            for attribute in attributes {
                sink.row_start();
                sink.cell(&attribute_label(attribute));
                sink.cell(&attribute.type_name);
                sink.raw_cell(&doc_html(attribute.doc.as_ref()));
                sink.row_end();
            }
            sink.table_end();
        }

        if tag.no_content {
            sink.paragraph(NO_CONTENT_TEXT);
        } else if let Some(body) = &tag.body {
            sink.section_start("body");
            sink.raw_text(&doc_html(Some(body)));
            sink.section_end();
        }
        sink.section_end();
    }
}

fn is_hidden(attribute: &AttributeRecord) -> bool {
    HIDDEN_ATTRIBUTES.contains(&attribute.name.as_str())
}

fn attribute_label(attribute: &AttributeRecord) -> String {
    let mut label = attribute.name.clone();
    if attribute.required {
        label.push_str(" (required)");
    }
    if attribute.deprecated {
        label.push_str(" (deprecated)");
    }
    label
}

/// Stable sort of references by a string key.
fn sorted_by_name<T>(items: &[T], key: impl Fn(&T) -> &String) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| key(a).cmp(key(b)));
    sorted
}

fn link(anchor: &str, text: &str) -> String {
    format!(
        "<a href='#{}'>{}</a>",
        escape_html(&anchor_id(anchor)),
        escape_html(text)
    )
}

/// HTML for a doc: prose only, block annotations dropped, run through the
/// markup renderer. A missing doc renders as nothing.
fn doc_html(doc: Option<&Doc>) -> String {
    doc.map(|doc| MarkupRenderer::new().render_nodes(&doc.content))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::HtmlSink;
    use jellydoc_markup::{Element, Node, sanitize_html};
    use jellydoc_taglib::{BlockTag, parse_taglib, to_xml};

    fn render(taglib: &Taglib) -> String {
        let mut sink = HtmlSink::new();
        ReferenceRenderer::new(taglib).render(&mut sink);
        sink.finish(TITLE)
    }

    fn tag(name: &str) -> TagRecord {
        TagRecord {
            class_name: format!("{name}Tag"),
            name: name.to_owned(),
            ..Default::default()
        }
    }

    fn attribute(name: &str) -> AttributeRecord {
        AttributeRecord {
            name: name.to_owned(),
            type_name: "java.lang.String".to_owned(),
            ..Default::default()
        }
    }

    fn library(name: &str, tags: Vec<TagRecord>) -> Library {
        let mut library = Library::for_package(name, None);
        library.tags = tags;
        library
    }

    #[test]
    fn test_intro_and_title() {
        let html = render(&Taglib::default());
        assert!(html.contains("<title>Jelly Taglib references</title>"));
        assert!(
            html.contains("<p>The following Jelly tag libraries are defined in this project.</p>")
        );
        assert!(!html.contains("Namespace URI"));
    }

    #[test]
    fn test_tags_sorted_after_xml_round_trip() {
        let taglib = Taglib {
            libraries: vec![library(
                "com.example.tags",
                vec![tag("zeta"), tag("alpha"), tag("mid")],
            )],
        };
        let taglib = parse_taglib(&to_xml(&taglib).unwrap()).unwrap();
        let html = render(&taglib);

        let alpha = html.find("'#tags.3Aalpha'").unwrap();
        let mid = html.find("'#tags.3Amid'").unwrap();
        let zeta = html.find("'#tags.3Azeta'").unwrap();
        assert!(alpha < mid && mid < zeta);
    }

    #[test]
    fn test_library_summary_only_for_several_libraries() {
        let taglib = Taglib {
            libraries: vec![
                library("org.b.xml", vec![tag("parse")]),
                library("org.a.core", vec![tag("set")]),
            ],
        };
        let html = render(&taglib);

        assert!(html.contains("<th>Namespace URI</th><th>Description</th>"));
        let core = html.find("<a href='#core'>jelly:core</a>").unwrap();
        let xml = html.find("<a href='#xml'>jelly:xml</a>").unwrap();
        assert!(core < xml);
        assert!(html.contains(r#"<a id="core"></a>"#));
        assert!(html.contains("<h2>jelly:core</h2>"));
    }

    #[test]
    fn test_schema_link() {
        let taglib = Taglib {
            libraries: vec![library("com.example.tags", vec![tag("foo")])],
        };
        let html = render(&taglib);
        assert!(html.contains(
            "<p>This tag library is <a href='taglib-tags.xsd'>also available as an XML Schema</a></p>"
        ));
        assert!(html.contains(r#"<a id="tags.3Afoo"></a>"#));
        assert!(html.contains("<h3>foo</h3>"));
    }

    #[test]
    fn test_no_content_tag() {
        let mut no_content = tag("break");
        no_content.no_content = true;
        no_content.body = Some(Doc::from_content(vec![Node::Text("ignored".to_owned())]));
        let taglib = Taglib {
            libraries: vec![library("p.core", vec![no_content])],
        };
        let html = render(&taglib);

        assert!(html.contains("<p>This tag does not accept any child elements/text.</p>"));
        assert!(!html.contains(">body</h"));
        assert!(!html.contains("ignored"));
    }

    #[test]
    fn test_body_section() {
        let mut with_body = tag("when");
        with_body.body = Some(Doc::from_content(vec![Node::Text("Nested script".to_owned())]));
        let taglib = Taglib {
            libraries: vec![library("p.core", vec![with_body])],
        };
        let html = render(&taglib);

        assert!(html.contains("<h4>body</h4>"));
        assert!(html.contains("<p>Nested script</p>"));
        assert!(!html.contains("does not accept"));
    }

    #[test]
    fn test_hidden_attributes_never_listed() {
        let mut set = tag("set");
        set.attributes = vec![attribute("escapeText"), attribute("var"), attribute("trim")];
        let mut hidden_only = tag("out");
        hidden_only.attributes = vec![attribute("trim"), attribute("escapeText")];
        let taglib = Taglib {
            libraries: vec![library("p.core", vec![set, hidden_only])],
        };
        let html = render(&taglib);

        assert!(!html.contains("escapeText"));
        assert!(!html.contains(">trim<"));
        assert!(html.contains("<td>var</td>"));
        assert_eq!(html.matches("<th>Attribute Name</th>").count(), 1);
    }

    #[test]
    fn test_attribute_row() {
        let mut set = tag("set");
        let mut var = attribute("var");
        var.required = true;
        var.deprecated = true;
        var.doc = Some(Doc::from_content(vec![Node::Text("The variable.".to_owned())]));
        let mut scope = attribute("scope");
        scope.type_name = "int".to_owned();
        set.attributes = vec![var, scope];
        let taglib = Taglib {
            libraries: vec![library("p.core", vec![set])],
        };
        let html = render(&taglib);

        assert!(html.contains(
            "<tr><td>var (required) (deprecated)</td><td>java.lang.String</td><td><p>The variable.</p></td></tr>"
        ));
        let scope = html.find("<td>scope</td>").unwrap();
        let var = html.find("<td>var (required)").unwrap();
        assert!(scope < var);
    }

    #[test]
    fn test_block_tags_dropped_from_doc() {
        let mut set = tag("set");
        set.doc = Some(Doc {
            content: vec![Node::Element(Element::new("p").with_text("Sets a variable."))],
            block_tags: vec![BlockTag::new("author", "Jane")],
        });
        let taglib = Taglib {
            libraries: vec![library("p.core", vec![set])],
        };
        let html = render(&taglib);

        assert!(html.contains("<p>Sets a variable.</p>"));
        assert!(!html.contains("Jane"));
    }

    #[test]
    fn test_inline_code_escaped_once() {
        let mut set = tag("set");
        set.doc = Some(Doc::from_content(sanitize_html(
            "Evaluates `a && b < c` lazily.",
        )));
        let taglib = Taglib {
            libraries: vec![library("p.core", vec![set])],
        };
        let taglib = parse_taglib(&to_xml(&taglib).unwrap()).unwrap();
        let html = render(&taglib);

        assert!(
            html.contains("<p>Evaluates <code>a &amp;&amp; b &lt; c</code> lazily.</p>"),
            "{html}"
        );
        assert!(!html.contains("&amp;amp;"));
    }

    #[test]
    fn test_malformed_html_in_doc_is_rendered() {
        let mut set = tag("set");
        set.doc = Some(Doc::from_content(sanitize_html("Sets an <b>important value")));
        let html = render(&Taglib {
            libraries: vec![library("p.core", vec![set])],
        });
        assert!(html.contains("Sets an <b>important value</b>"));
    }
}
