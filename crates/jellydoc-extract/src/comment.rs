//! Doc comment text extraction.
//!
//! A raw comment is split into body prose and block annotations. Inline
//! tags in the body are resolved to display text: cross references to
//! their label (or the reference itself) and literal spans to escaped text.
//! The body stays in its source format (HTML or markup); converting it is
//! the caller's job.

use jellydoc_markup::escape_html;
use jellydoc_taglib::BlockTag;

use crate::error::DocCommentError;

/// A parsed doc comment.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Body prose with inline tags resolved.
    pub body: String,
    /// Block annotations with non-empty text, in source order.
    pub block_tags: Vec<BlockTag>,
}

/// Parse a raw doc comment.
///
/// Accepts the comment with or without its `/** */` delimiters. Leading `*`
/// decoration is stripped from every line. A line whose first non-blank
/// character is `@` followed by a name starts a block annotation that runs
/// until the next one; block text is kept verbatim.
pub fn parse_comment(raw: &str) -> Result<DocComment, DocCommentError> {
    let mut body_lines = Vec::new();
    let mut blocks: Vec<(&str, Vec<&str>)> = Vec::new();

    for line in strip_decoration(raw) {
        if let Some((name, text)) = block_tag_start(line) {
            blocks.push((name, vec![text]));
        } else if let Some((_, lines)) = blocks.last_mut() {
            lines.push(line);
        } else {
            body_lines.push(line);
        }
    }

    let body = render_inline(body_lines.join("\n").trim())?;
    let block_tags = blocks
        .into_iter()
        .filter_map(|(name, lines)| {
            let text = lines.join("\n");
            let text = text.trim();
            (!text.is_empty()).then(|| BlockTag::new(name, text))
        })
        .collect();

    Ok(DocComment { body, block_tags })
}

fn strip_decoration(raw: &str) -> Vec<&str> {
    let raw = raw.trim();
    let raw = match raw.strip_prefix("/**") {
        Some(inner) => inner.strip_suffix("*/").unwrap_or(inner),
        None => raw,
    };
    raw.lines()
        .map(|line| match line.trim_start().strip_prefix('*') {
            Some(rest) => {
                let rest = rest.trim_start_matches('*');
                rest.strip_prefix(' ').unwrap_or(rest)
            }
            None => line,
        })
        .collect()
}

fn block_tag_start(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('@')?;
    let (name, text) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        .then_some((name, text))
}

/// Resolve inline tags (`{@name content}`) in body text.
fn render_inline(text: &str) -> Result<String, DocCommentError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut consumed = 0;

    while let Some(start) = rest.find("{@") {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];
        let Some(end) = closing_brace(tag) else {
            return Err(DocCommentError::UnterminatedInlineTag {
                tag: inline_tag_name(&tag[2..]).to_owned(),
                offset: consumed + start,
            });
        };
        out.push_str(&render_inline_tag(&tag[..=end])?);
        consumed += start + end + 1;
        rest = &tag[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Index of the brace closing the one at the start of `text`.
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn inline_tag_name(text: &str) -> &str {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '}')
        .unwrap_or(text.len());
    &text[..end]
}

/// Render one complete inline tag, braces included.
fn render_inline_tag(tag: &str) -> Result<String, DocCommentError> {
    let inner = &tag[2..tag.len() - 1];
    let name = inline_tag_name(inner);
    let content = inner[name.len()..].trim_start();

    match name {
        "link" | "linkplain" => {
            let (reference, label) = split_reference(content);
            let label = label.trim();
            if label.is_empty() {
                Ok(reference.to_owned())
            } else {
                render_inline(label)
            }
        }
        "code" | "literal" => Ok(escape_html(content)),
        _ => Ok(tag.to_owned()),
    }
}

/// Split a link target from its label.
///
/// The reference ends at the first whitespace outside parentheses, so
/// `Foo#bar(int, String) the label` keeps its parameter list intact.
fn split_reference(content: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (i, c) in content.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => return (&content[..i], &content[i..]),
            _ => {}
        }
    }
    (content, "")
}
