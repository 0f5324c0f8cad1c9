//! Body filters applied to raw post content before conversion.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// A filter failed to render a body.
#[derive(Debug, Error)]
#[error("body filter failed: {0}")]
pub struct FilterError(pub String);

/// Turns a stored post body into the HTML a reader would see.
pub trait BodyFilter {
    fn render_body(&self, raw: &str) -> Result<String, FilterError>;
}

impl<F: BodyFilter + ?Sized> BodyFilter for &F {
    fn render_body(&self, raw: &str) -> Result<String, FilterError> {
        (**self).render_body(raw)
    }
}

/// Returns the body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFilter;

impl BodyFilter for PassthroughFilter {
    fn render_body(&self, raw: &str) -> Result<String, FilterError> {
        Ok(raw.to_string())
    }
}

/// Paragraph filter for bodies written with blank lines instead of `<p>` tags.
///
/// Text separated by blank lines becomes `<p>` elements and single newlines
/// inside them become `<br />`. Chunks that already start with a block-level
/// tag are left alone, as is everything inside `<pre>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoParagraphFilter;

static PRE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[\s>].*?</pre>").expect("valid regex"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid regex"));

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^</?(?:p|div|h[1-6]|ul|ol|li|dl|dd|dt|blockquote|pre|table|thead|tbody|tfoot|tr|td|th|hr|figure|figcaption|section|article|aside|header|footer|nav|address|form|fieldset|details|summary|script|style|!--)[\s>/]",
    )
    .expect("valid regex")
});

impl BodyFilter for AutoParagraphFilter {
    fn render_body(&self, raw: &str) -> Result<String, FilterError> {
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let mut blocks: Vec<String> = Vec::new();
        let mut last = 0;

        for pre in PRE_BLOCK.find_iter(&text) {
            paragraphs(&text[last..pre.start()], &mut blocks);
            blocks.push(pre.as_str().to_string());
            last = pre.end();
        }
        paragraphs(&text[last..], &mut blocks);

        Ok(blocks.join("\n\n"))
    }
}

fn paragraphs(text: &str, blocks: &mut Vec<String>) {
    for chunk in PARAGRAPH_BREAK.split(text) {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        if BLOCK_START.is_match(chunk) {
            blocks.push(chunk.to_string());
        } else {
            blocks.push(format!("<p>{}</p>", chunk.replace('\n', "<br />\n")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn autop(raw: &str) -> String {
        AutoParagraphFilter.render_body(raw).unwrap()
    }

    #[test]
    fn passthrough_is_identity() {
        let raw = "line one\n\nline <b>two</b>";
        assert_eq!(PassthroughFilter.render_body(raw).unwrap(), raw);
    }

    #[test]
    fn blank_lines_become_paragraphs() {
        assert_eq!(autop("one\n\ntwo"), "<p>one</p>\n\n<p>two</p>");
    }

    #[test]
    fn single_newlines_become_breaks() {
        assert_eq!(autop("a\nb"), "<p>a<br />\nb</p>");
    }

    #[test]
    fn block_chunks_are_left_alone() {
        assert_eq!(
            autop("<h2>Title</h2>\n\ntext\n\n<ul>\n<li>x</li>\n</ul>"),
            "<h2>Title</h2>\n\n<p>text</p>\n\n<ul>\n<li>x</li>\n</ul>"
        );
    }

    #[test]
    fn preformatted_blocks_are_untouched() {
        let raw = "before\n\n<pre>a\n\n\nb</pre>\n\nafter";
        assert_eq!(
            autop(raw),
            "<p>before</p>\n\n<pre>a\n\n\nb</pre>\n\n<p>after</p>"
        );
    }

    #[test]
    fn windows_line_endings_are_normalized() {
        assert_eq!(autop("one\r\n\r\ntwo"), "<p>one</p>\n\n<p>two</p>");
    }

    #[test]
    fn empty_body_stays_empty() {
        assert_eq!(autop(""), "");
        assert_eq!(autop("\n\n\n"), "");
    }

    #[test]
    fn inline_tags_still_get_wrapped() {
        assert_eq!(autop("<b>bold</b> start"), "<p><b>bold</b> start</p>");
    }
}
