//! HTML to Markdown conversion.
//!
//! Post bodies are parsed with html5ever, which recovers from malformed
//! markup the way browsers do, and the resulting DOM is walked into
//! Markdown. Conversion never fails: anything the walker does not
//! recognize is unwrapped to its text.

mod text;
mod walker;


use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

pub use walker::MAX_NESTING;

/// Converts an HTML fragment or document to Markdown.
///
/// The output has no leading or trailing blank lines, no trailing
/// whitespace on lines outside code blocks, and at most one blank line
/// between blocks. Calling it twice on the same input yields the same text.
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    text::finish(&walker::render(&dom.document))
}
