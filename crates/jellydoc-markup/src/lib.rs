//! Markup rendering and tolerant HTML re-emission for jellydoc.
//!
//! Doc comment prose reaches the tag library document through two stages:
//!
//! - [`MarkupRenderer`] turns lightweight markup into an HTML fragment
//!   (no document wrapper, no line breaks).
//! - [`sanitize_html`] parses a possibly malformed HTML fragment and
//!   re-emits it as a well-formed [`Node`] tree, lower-casing names and
//!   eliding the `html`/`head`/`body` wrappers.
//!
//! The [`Node`] tree is shared with the `taglib.xml` codec, which writes it
//! into `doc` elements and reads it back for the reference report.
//!
//! # Example
//!
//! ```
//! use jellydoc_markup::{MarkupRenderer, sanitize_html, to_html};
//!
//! let html = MarkupRenderer::new().render("Sets the **name**.");
//! let nodes = sanitize_html(&html);
//! assert_eq!(to_html(&nodes), "<p>Sets the <strong>name</strong>.</p>");
//! ```

mod markup;
mod node;
mod sanitize;

pub use markup::MarkupRenderer;
pub use node::{Element, Node, TreeBuilder, escape_html, text_content, to_html};
pub use sanitize::sanitize_html;
