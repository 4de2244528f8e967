//! Tolerant HTML fragment re-emission.
//!
//! Doc comments are not guaranteed to be well-formed HTML. The fragment is
//! parsed with html5ever, which repairs unclosed and misnested tags the way
//! a browser would, and the resulting DOM is replayed as start/end/text
//! events into a [`TreeBuilder`]. The document wrappers html5ever inserts
//! are elided while their children are kept.
//!
//! html5ever accepts tag and attribute names that are not XML names, so
//! prose such as `Map<K,V>` parses as an element named `k,v`. The tree is
//! written into `taglib.xml`, so an element whose name is not an XML name
//! is re-emitted as the text of its start tag, and such attributes are
//! dropped.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::node::{Node, TreeBuilder};

/// Wrapper elements dropped from the output (their children are kept).
const WRAPPER_ELEMENTS: &[&str] = &["html", "head", "body"];

enum Step {
    Enter(Handle),
    Leave,
}

/// Parse an HTML fragment and re-emit it as well-formed nested nodes.
///
/// Element and attribute names are lower-cased. Comments, doctypes and
/// processing instructions are dropped. Never fails: malformed markup
/// degrades to a best-effort tree.
pub fn sanitize_html(fragment: &str) -> Vec<Node> {
    if fragment.trim().is_empty() {
        return Vec::new();
    }

    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(fragment.as_bytes());

    let mut builder = TreeBuilder::new();
    let mut steps: Vec<Step> = dom
        .document
        .children
        .borrow()
        .iter()
        .rev()
        .cloned()
        .map(Step::Enter)
        .collect();

    while let Some(step) = steps.pop() {
        let handle = match step {
            Step::Leave => {
                builder.end();
                continue;
            }
            Step::Enter(handle) => handle,
        };

        match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let local = name.local.as_ref().to_ascii_lowercase();
                let attrs: Vec<(String, String)> = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        (
                            attr.name.local.as_ref().to_ascii_lowercase(),
                            attr.value.to_string(),
                        )
                    })
                    .collect();

                if WRAPPER_ELEMENTS.contains(&local.as_str()) {
                    // Children only.
                } else if is_xml_name(&local) {
                    let attrs = attrs
                        .into_iter()
                        .filter(|(key, _)| is_xml_name(key))
                        .collect();
                    builder.start(local, attrs);
                    steps.push(Step::Leave);
                } else {
                    builder.text(&start_tag_text(&local, &attrs));
                }
                for child in handle.children.borrow().iter().rev() {
                    steps.push(Step::Enter(child.clone()));
                }
            }
            NodeData::Text { contents } => {
                let contents = contents.borrow();
                builder.text(&contents);
            }
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    builder.finish()
}

/// Source text of a start tag, for elements that cannot be written as XML.
fn start_tag_text(name: &str, attrs: &[(String, String)]) -> String {
    let mut text = format!("<{name}");
    for (key, value) in attrs {
        text.push(' ');
        text.push_str(key);
        if !value.is_empty() {
            text.push_str("=\"");
            text.push_str(value);
            text.push('"');
        }
    }
    text.push('>');
    text
}

/// Whether `name` is an XML name without a namespace prefix.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

fn is_name_start_char(ch: char) -> bool {
    matches!(ch,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch)
        || matches!(ch,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}
