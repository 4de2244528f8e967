//! Lightweight markup to HTML fragment renderer.
//!
//! Doc comments written in markup are rendered with pulldown-cmark into an
//! HTML fragment: no document wrapper and no line breaks. Consumers of the
//! generated reference do not wrap long lines, so breaks inside a paragraph
//! are suppressed.
//!
//! The wiki dialect this replaces rendered a suppressed break as nothing.
//! Here soft and hard breaks become a single space instead: CommonMark
//! source lines do not end in a space, and rendering the break as nothing
//! would join the last word of a line to the first word of the next.

use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::node::{Node, escape_html, write_end_tag, write_start_tag};

/// Elements whose text is literal rather than markup.
const LITERAL_ELEMENTS: &[&str] = &["code", "pre", "kbd", "samp"];

/// Table rendering state.
#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell_index: usize,
}

impl TableState {
    fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Markup renderer producing HTML fragments.
///
/// Never fails: malformed markup is rendered best-effort by the parser.
pub struct MarkupRenderer {
    output: String,
    table: TableState,
    /// Alt text being collected for an image, with its source and title.
    image: Option<(String, String, String)>,
    in_code_block: bool,
}

impl MarkupRenderer {
    /// Create a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(1024),
            table: TableState::default(),
            image: None,
            in_code_block: false,
        }
    }

    fn parser_options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }

    /// Render markup text to an HTML fragment.
    pub fn render(mut self, markup: &str) -> String {
        for event in Parser::new_ext(markup, Self::parser_options()) {
            self.process_event(event);
        }
        self.output
    }

    /// Render a node tree whose text may carry markup.
    ///
    /// Elements pass through as HTML. Code spans in the text become `code`
    /// elements before parsing, since markup leaves entities inside code
    /// spans undecoded and the tree's text would otherwise be escaped twice.
    pub fn render_nodes(self, nodes: &[Node]) -> String {
        let mut source = String::with_capacity(256);
        write_source(nodes, false, &mut source);
        self.render(&source)
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                write!(self.output, "<code>{}</code>", escape_html(&code)).unwrap();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak | Event::HardBreak => self.line_break(),
            Event::Rule => self.output.push_str("<hr />"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                write!(self.output, r#"<input type="checkbox" disabled{checked} />"#).unwrap();
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => write!(self.output, "<{level}>").unwrap(),
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        let lang = info.split_whitespace().next().unwrap_or_default();
                        write!(
                            self.output,
                            r#"<pre><code class="language-{}">"#,
                            escape_html(lang)
                        )
                        .unwrap();
                    }
                    _ => self.output.push_str("<pre><code>"),
                }
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => write!(self.output, r#"<ol start="{start}">"#).unwrap(),
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell_index = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.cell_index = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let cell = if self.table.in_head { "th" } else { "td" };
                let align = self.table.current_alignment_style();
                write!(self.output, "<{cell}{align}>").unwrap();
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                if title.is_empty() {
                    write!(self.output, r#"<a href="{}">"#, escape_html(&dest_url)).unwrap();
                } else {
                    write!(
                        self.output,
                        r#"<a href="{}" title="{}">"#,
                        escape_html(&dest_url),
                        escape_html(&title)
                    )
                    .unwrap();
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some((dest_url.to_string(), title.to_string(), String::new()));
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => write!(self.output, "</{level}>").unwrap(),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.output.push_str("</code></pre>");
            }
            TagEnd::List(true) => self.output.push_str("</ol>"),
            TagEnd::List(false) => self.output.push_str("</ul>"),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                let cell = if self.table.in_head { "th" } else { "td" };
                write!(self.output, "</{cell}>").unwrap();
                self.table.cell_index += 1;
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.take() {
                    write!(
                        self.output,
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    )
                    .unwrap();
                    if !title.is_empty() {
                        write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    self.output.push_str(" />");
                }
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, _, alt)) = self.image.as_mut() {
            alt.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    /// Line breaks are suppressed; a space keeps adjacent words apart.
    fn line_break(&mut self) {
        if self.in_code_block {
            self.output.push('\n');
        } else if let Some((_, _, alt)) = self.image.as_mut() {
            alt.push(' ');
        } else {
            self.output.push(' ');
        }
    }
}

fn write_source(nodes: &[Node], literal: bool, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) if literal => out.push_str(&escape_literal(text)),
            Node::Text(text) => write_markup_text(text, out),
            Node::Element(element) => {
                if write_start_tag(element, out) {
                    continue;
                }
                let literal = literal || LITERAL_ELEMENTS.contains(&element.name.as_str());
                write_source(&element.children, literal, out);
                write_end_tag(element, out);
            }
        }
    }
}

/// Write text as markup source, turning backtick code spans into `code`
/// elements. Unmatched backticks are written as character references.
fn write_markup_text(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(open) = rest.find('`') {
        out.push_str(&escape_html(&rest[..open]));
        let run = backtick_run(&rest[open..]);
        let after = &rest[open + run..];
        if let Some(close) = closing_run(after, run) {
            out.push_str("<code>");
            out.push_str(&escape_literal(&code_span_content(&after[..close])));
            out.push_str("</code>");
            rest = &after[close + run..];
        } else {
            out.push_str(&"&#96;".repeat(run));
            rest = after;
        }
    }
    out.push_str(&escape_html(rest));
}

fn backtick_run(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b'`').count()
}

/// Byte offset of the next backtick run of exactly `len`.
fn closing_run(text: &str, len: usize) -> Option<usize> {
    let mut offset = 0;
    while let Some(found) = text[offset..].find('`') {
        let start = offset + found;
        let run = backtick_run(&text[start..]);
        if run == len {
            return Some(start);
        }
        offset = start + run;
    }
    None
}

/// Code span content: line endings become spaces, and one space is
/// stripped from each end when both ends have one.
fn code_span_content(raw: &str) -> String {
    let content = raw.replace('\n', " ");
    match content.strip_prefix(' ').and_then(|c| c.strip_suffix(' ')) {
        Some(inner) if !content.trim().is_empty() => inner.to_owned(),
        _ => content,
    }
}

/// Escape text so markup treats it as literal characters.
fn escape_literal(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\\' | '`' | '*' | '_' | '[' | ']' | '~' | '|' => {
                write!(result, "&#{};", u32::from(ch)).unwrap();
            }
            _ => result.push(ch),
        }
    }
    result
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;
    use pretty_assertions::assert_eq;

    fn render(markup: &str) -> String {
        MarkupRenderer::new().render(markup)
    }

    #[test]
    fn test_paragraph_without_document_wrapper() {
        let html = render("Hello world");
        assert_eq!(html, "<p>Hello world</p>");
        assert!(!html.contains("<html"));
        assert!(!html.contains("<body"));
    }

    #[test]
    fn test_soft_break_suppressed() {
        assert_eq!(render("first line\nsecond line"), "<p>first line second line</p>");
    }

    #[test]
    fn test_hard_break_suppressed() {
        let html = render("first  \nsecond");
        assert!(!html.contains("<br"));
        assert_eq!(html, "<p>first second</p>");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            render("*em* **strong** `code` ~~gone~~"),
            "<p><em>em</em> <strong>strong</strong> <code>code</code> <s>gone</s></p>"
        );
    }

    #[test]
    fn test_heading() {
        assert_eq!(render("## Usage"), "<h2>Usage</h2>");
    }

    #[test]
    fn test_lists() {
        assert_eq!(render("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(render("3. c\n4. d"), r#"<ol start="3"><li>c</li><li>d</li></ol>"#);
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render("[docs](https://example.com/a?b=1&c=2)"),
            r#"<p><a href="https://example.com/a?b=1&amp;c=2">docs</a></p>"#
        );
    }

    #[test]
    fn test_image_collects_alt_text() {
        assert_eq!(
            render("![a diagram](d.png)"),
            r#"<p><img src="d.png" alt="a diagram" /></p>"#
        );
    }

    #[test]
    fn test_code_block_keeps_newlines() {
        assert_eq!(
            render("```xml\n<j:set/>\n<j:out/>\n```"),
            "<pre><code class=\"language-xml\">&lt;j:set/&gt;\n&lt;j:out/&gt;\n</code></pre>"
        );
    }

    #[test]
    fn test_table() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            html,
            "<table><thead><tr><th style=\"text-align: left\">a</th>\
             <th style=\"text-align: right\">b</th></tr></thead><tbody>\
             <tr><td style=\"text-align: left\">1</td>\
             <td style=\"text-align: right\">2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_embedded_html_passes_through() {
        assert_eq!(render("a <b>bold</b> word"), "<p>a <b>bold</b> word</p>");
    }

    #[test]
    fn test_text_escaped() {
        assert_eq!(render("a & b"), "<p>a &amp; b</p>");
    }

    #[test]
    fn test_blocks_not_separated_by_newlines() {
        let html = render("one\n\ntwo");
        assert_eq!(html, "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_nodes_code_span_escaped_once() {
        let nodes = vec![Node::Text("Evaluates `a && b < c` lazily.".to_owned())];
        assert_eq!(
            MarkupRenderer::new().render_nodes(&nodes),
            "<p>Evaluates <code>a &amp;&amp; b &lt; c</code> lazily.</p>"
        );
    }

    #[test]
    fn test_nodes_code_span_inside_block_element() {
        let nodes = vec![Node::Element(
            Element::new("p").with_text("Use `x<y` or **both**."),
        )];
        assert_eq!(
            MarkupRenderer::new().render_nodes(&nodes),
            "<p>Use <code>x&lt;y</code> or **both**.</p>"
        );
    }

    #[test]
    fn test_nodes_text_markup_applied() {
        let nodes = vec![
            Node::Text("Sets a **variable** to ".to_owned()),
            Node::Element(Element::new("b").with_text("a < b")),
        ];
        assert_eq!(
            MarkupRenderer::new().render_nodes(&nodes),
            "<p>Sets a <strong>variable</strong> to <b>a &lt; b</b></p>"
        );
    }

    #[test]
    fn test_nodes_literal_element_text() {
        let nodes = vec![
            Node::Text("Call ".to_owned()),
            Node::Element(Element::new("code").with_text("*args & `x`")),
        ];
        assert_eq!(
            MarkupRenderer::new().render_nodes(&nodes),
            "<p>Call <code>*args &amp; `x`</code></p>"
        );
    }

    #[test]
    fn test_nodes_unmatched_backtick_is_text() {
        let nodes = vec![Node::Text("a ` b".to_owned())];
        assert_eq!(MarkupRenderer::new().render_nodes(&nodes), "<p>a ` b</p>");
    }

    #[test]
    fn test_code_span_content() {
        assert_eq!(code_span_content(" a "), "a");
        assert_eq!(code_span_content("  "), "  ");
        assert_eq!(code_span_content("a\nb"), "a b");
        assert_eq!(code_span_content(" a"), " a");
    }
}
