//! Report output primitives and the HTML page sink.

use std::fmt::Write;

use jellydoc_markup::escape_html;

/// Structural primitives a report is written with.
///
/// Text arguments are plain text and escaped by the sink; `raw_*` arguments
/// are HTML fragments written as is.
pub trait ReportSink {
    /// Open a (nested) section with a heading.
    fn section_start(&mut self, title: &str);
    /// Close the innermost section.
    fn section_end(&mut self);
    /// Paragraph of plain text.
    fn paragraph(&mut self, text: &str);
    /// Paragraph of HTML.
    fn raw_paragraph(&mut self, html: &str);
    /// HTML written at the current position.
    fn raw_text(&mut self, html: &str);
    /// Link target named `name`.
    fn anchor(&mut self, name: &str);
    /// Open a table.
    fn table_start(&mut self);
    /// Close the current table.
    fn table_end(&mut self);
    /// Header row with the given column titles.
    fn table_header(&mut self, columns: &[&str]);
    /// Open a body row.
    fn row_start(&mut self);
    /// Close the current row.
    fn row_end(&mut self);
    /// Cell of plain text.
    fn cell(&mut self, text: &str);
    /// Cell of HTML.
    fn raw_cell(&mut self, html: &str);
}

/// Element id for an anchor name.
///
/// `:` is not safe in every id consumer, so it is written as `.3A`. Links
/// must go through the same function to match.
pub fn anchor_id(name: &str) -> String {
    name.replace(':', ".3A")
}

/// Sink producing a standalone HTML page.
pub struct HtmlSink {
    body: String,
    depth: usize,
}

impl HtmlSink {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: String::with_capacity(8192),
            depth: 0,
        }
    }

    /// Close open sections and wrap the body in a page titled `title`.
    pub fn finish(mut self, title: &str) -> String {
        while self.depth > 0 {
            self.section_end();
        }

        let mut html = String::with_capacity(self.body.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        writeln!(html, "<title>{}</title>", escape_html(title)).unwrap();
        html.push_str("</head>\n<body>\n<main>\n");
        writeln!(html, "<h1>{}</h1>", escape_html(title)).unwrap();
        html.push_str(&self.body);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn heading_level(&self) -> usize {
        // h1 is the page title
        (self.depth + 1).min(6)
    }
}

impl Default for HtmlSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for HtmlSink {
    fn section_start(&mut self, title: &str) {
        self.depth += 1;
        let level = self.heading_level();
        writeln!(
            self.body,
            "<section>\n<h{level}>{}</h{level}>",
            escape_html(title)
        )
        .unwrap();
    }

    fn section_end(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        self.body.push_str("</section>\n");
    }

    fn paragraph(&mut self, text: &str) {
        writeln!(self.body, "<p>{}</p>", escape_html(text)).unwrap();
    }

    fn raw_paragraph(&mut self, html: &str) {
        writeln!(self.body, "<p>{html}</p>").unwrap();
    }

    fn raw_text(&mut self, html: &str) {
        self.body.push_str(html);
        self.body.push('\n');
    }

    fn anchor(&mut self, name: &str) {
        writeln!(self.body, r#"<a id="{}"></a>"#, escape_html(&anchor_id(name))).unwrap();
    }

    fn table_start(&mut self) {
        self.body.push_str("<table>\n");
    }

    fn table_end(&mut self) {
        self.body.push_str("</table>\n");
    }

    fn table_header(&mut self, columns: &[&str]) {
        self.body.push_str("<tr>");
        for column in columns {
            write!(self.body, "<th>{}</th>", escape_html(column)).unwrap();
        }
        self.body.push_str("</tr>\n");
    }

    fn row_start(&mut self) {
        self.body.push_str("<tr>");
    }

    fn row_end(&mut self) {
        self.body.push_str("</tr>\n");
    }

    fn cell(&mut self, text: &str) {
        write!(self.body, "<td>{}</td>", escape_html(text)).unwrap();
    }

    fn raw_cell(&mut self, html: &str) {
        write!(self.body, "<td>{html}</td>").unwrap();
    }
}
