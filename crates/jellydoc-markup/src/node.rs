//! Element/text tree shared by the sanitizer and the taglib codec.

use std::fmt::Write;

/// A node in a doc fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (unescaped).
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Local element name.
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Builder: append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Builder: append an element child.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Value of the first attribute with the given name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given name.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }
}

/// Builds a [`Node`] tree from start/end/text events.
///
/// Keeps an explicit stack of open elements: `start` pushes, `end` pops and
/// attaches the finished element to its parent, `text` appends to the top.
/// Unbalanced input never panics: a stray `end` is ignored and `finish`
/// closes whatever is still open.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new element as a child of the current one.
    pub fn start(&mut self, name: impl Into<String>, attrs: Vec<(String, String)>) {
        self.open.push(Element {
            name: name.into(),
            attrs,
            children: Vec::new(),
        });
    }

    /// Close the current element. Returns `false` if nothing was open.
    pub fn end(&mut self) -> bool {
        let Some(element) = self.open.pop() else {
            return false;
        };
        self.current_children().push(Node::Element(element));
        true
    }

    /// Append character data to the current element.
    pub fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = self.current_children();
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Node::Text(text.to_owned()));
        }
    }

    /// Number of currently open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Close all open elements and return the top-level nodes.
    #[must_use]
    pub fn finish(mut self) -> Vec<Node> {
        while self.end() {}
        self.root
    }

    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        }
    }
}

/// HTML elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Escape text for HTML/XML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Serialize nodes as an HTML fragment.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::with_capacity(256);
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Element(element) => {
            if write_start_tag(element, out) {
                return;
            }
            for child in &element.children {
                write_node(child, out);
            }
            write_end_tag(element, out);
        }
    }
}

/// Write the start tag of `element`. Returns true when it was written as a
/// void element, which takes no children or end tag.
pub(crate) fn write_start_tag(element: &Element, out: &mut String) -> bool {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
    }
    if element.children.is_empty() && VOID_ELEMENTS.contains(&element.name.as_str()) {
        out.push_str(" />");
        return true;
    }
    out.push('>');
    false
}

pub(crate) fn write_end_tag(element: &Element, out: &mut String) {
    write!(out, "</{}>", element.name).unwrap();
}

/// Concatenated character data of a node list, depth first.
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut pending: Vec<&Node> = nodes.iter().rev().collect();
    while let Some(node) = pending.pop() {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => pending.extend(element.children.iter().rev()),
        }
    }
    out
}
