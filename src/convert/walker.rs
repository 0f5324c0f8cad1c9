//! DOM-to-Markdown walk.

use std::sync::LazyLock;

use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;

use super::text::{
    HARD_BREAK, block_fence, code_span, collapse_whitespace, escape_line_start, escape_markdown,
    normalize, single_line, trim_block,
};

/// Elements deeper than this are flattened to their text.
pub const MAX_NESTING: usize = 256;

/// Largest number CommonMark accepts in an ordered list marker.
const MAX_LIST_ORDINAL: usize = 999_999_999;

/// Elements dropped together with everything inside them.
const DISCARDED: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "svg", "canvas",
    "iframe", "object", "embed", "button", "select", "textarea",
];

/// Elements rendered as a paragraph-like block separated by blank lines.
const BLOCKS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "main", "aside", "nav", "figure",
    "figcaption", "address", "details", "summary", "dl", "dt", "dd", "center", "form", "fieldset",
    "caption", "li",
];

static CODE_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:language|lang)-([A-Za-z0-9_+#.-]+)").expect("valid regex")
});

#[derive(Clone, Copy, Default)]
struct Context {
    depth: usize,
    in_list_item: bool,
}

impl Context {
    fn descend(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    fn with_list_item(self, in_list_item: bool) -> Self {
        Self {
            in_list_item,
            ..self
        }
    }
}

/// Converts a parsed document to unnormalized Markdown.
pub(crate) fn render(document: &Handle) -> String {
    convert_node(document, Context::default())
}

fn convert_node(node: &Handle, ctx: Context) -> String {
    match &node.data {
        NodeData::Document => convert_children(node, ctx),
        NodeData::Text { contents } => escape_markdown(&collapse_whitespace(&contents.borrow())),
        NodeData::Element { name, .. } => {
            let tag: &str = &name.local;
            if DISCARDED.contains(&tag) {
                return String::new();
            }
            if ctx.depth >= MAX_NESTING {
                let text = escape_markdown(&collapse_whitespace(&text_content(node)));
                return escape_line_start(&text);
            }
            convert_element(tag, node, ctx.descend())
        }
        _ => String::new(),
    }
}

fn convert_children(node: &Handle, ctx: Context) -> String {
    let mut out = String::new();
    for child in node.children.borrow().iter() {
        let piece = convert_node(child, ctx);
        if matches!(child.data, NodeData::Text { .. }) && at_line_start(&out) {
            push_piece(&mut out, &escape_line_start(&piece));
        } else {
            push_piece(&mut out, &piece);
        }
    }
    out
}

/// True when the next piece appended to `out` would begin a line.
fn at_line_start(out: &str) -> bool {
    let out = out.trim_end_matches(' ');
    out.is_empty() || out.ends_with('\n')
}

/// Appends `piece`, dropping its leading spaces where they would double up
/// or start a line.
///
/// Spaces at the very start are kept so inline wrappers can move them
/// outside their markers; blocks trim them anyway.
fn push_piece(out: &mut String, piece: &str) {
    if out.ends_with('\n') || out.ends_with(' ') {
        out.push_str(piece.trim_start_matches(' '));
    } else {
        out.push_str(piece);
    }
}

fn convert_element(tag: &str, node: &Handle, ctx: Context) -> String {
    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = usize::from(tag.as_bytes()[1] - b'0');
            let content = single_line(&convert_children(node, ctx));
            if content.is_empty() {
                return String::new();
            }
            format!("\n\n{} {}\n\n", "#".repeat(level), content)
        }
        "br" => format!("{HARD_BREAK}\n"),
        "hr" => "\n\n* * *\n\n".to_string(),
        "strong" | "b" => wrap_inline(&convert_children(node, ctx), "**"),
        "em" | "i" => wrap_inline(&convert_children(node, ctx), "*"),
        "del" | "s" | "strike" => wrap_inline(&convert_children(node, ctx), "~~"),
        "code" | "kbd" | "samp" | "tt" => code_span(&collapse_whitespace(&text_content(node))),
        "pre" => convert_pre(node),
        "a" => convert_link(node, ctx),
        "img" => convert_image(node),
        "blockquote" => convert_blockquote(node, ctx),
        "ul" | "ol" => convert_list(node, tag == "ol", ctx),
        "table" | "thead" | "tbody" | "tfoot" => block(&convert_children(node, ctx)),
        "tr" => convert_table_row(node, ctx),
        "th" | "td" => format!("{} ", single_line(&convert_children(node, ctx))),
        _ if BLOCKS.contains(&tag) => block(&convert_children(node, ctx)),
        // Unknown or purely presentational: keep the content, drop the tag
        _ => convert_children(node, ctx),
    }
}

fn block(content: &str) -> String {
    let content = trim_block(content);
    if content.is_empty() {
        return String::new();
    }
    format!("\n\n{}\n\n", content)
}

/// Wraps inline content in `marker`, keeping surrounding spaces outside it.
fn wrap_inline(content: &str, marker: &str) -> String {
    let inner = trim_block(content);
    if inner.is_empty() {
        return content.to_string();
    }
    let leading = if content.starts_with(char::is_whitespace) {
        " "
    } else {
        ""
    };
    let trailing = if content.ends_with(char::is_whitespace) {
        " "
    } else {
        ""
    };
    format!("{leading}{marker}{inner}{marker}{trailing}")
}

fn convert_pre(node: &Handle) -> String {
    let raw = text_content(node);
    let code = raw.trim_end_matches(['\n', '\r']);
    let code = code.strip_prefix('\n').unwrap_or(code);
    if code.trim().is_empty() {
        return String::new();
    }

    let language = code_language(node).unwrap_or_default();
    let fence = block_fence(code);
    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}

/// Finds a `language-x` / `lang-x` class on the `pre` or its first `code` child.
fn code_language(pre: &Handle) -> Option<String> {
    let from = |node: &Handle| {
        attr(node, "class").and_then(|class| {
            CODE_LANGUAGE
                .captures(&class)
                .map(|caps| caps[1].to_string())
        })
    };

    from(pre).or_else(|| {
        pre.children
            .borrow()
            .iter()
            .find(|child| element_name(child).is_some_and(|n| n == "code"))
            .and_then(from)
    })
}

fn convert_link(node: &Handle, ctx: Context) -> String {
    let content = convert_children(node, ctx);
    let Some(href) = attr(node, "href").filter(|h| !h.trim().is_empty()) else {
        return content;
    };
    let href = href.trim().to_string();
    let text = trim_block(&content);
    if text.is_empty() {
        return String::new();
    }

    let plain = text_content(node);
    let linked = if plain.trim() == href && is_autolinkable(&href) {
        format!("<{}>", href)
    } else {
        format!(
            "[{}]({}{})",
            text,
            destination(&href),
            title_suffix(attr(node, "title"))
        )
    };

    wrap_inline(&content, "").replacen(text, &linked, 1)
}

fn convert_image(node: &Handle) -> String {
    let Some(src) = attr(node, "src").filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };
    let alt = attr(node, "alt")
        .map(|a| escape_markdown(&collapse_whitespace(&a)))
        .unwrap_or_default();
    format!(
        "![{}]({}{})",
        alt.trim(),
        destination(src.trim()),
        title_suffix(attr(node, "title"))
    )
}

fn is_autolinkable(href: &str) -> bool {
    (href.contains("://") || href.starts_with("mailto:"))
        && !href.contains(|c: char| c.is_whitespace() || c == '<' || c == '>')
}

/// Formats a link destination, bracketing it when it contains spaces or parentheses.
fn destination(href: &str) -> String {
    if href.contains(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>')) {
        format!("<{}>", href.replace('<', "%3C").replace('>', "%3E"))
    } else {
        href.to_string()
    }
}

fn title_suffix(title: Option<String>) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => {
            format!(" \"{}\"", collapse_whitespace(t.trim()).replace('"', "\\\""))
        }
        _ => String::new(),
    }
}

fn convert_blockquote(node: &Handle, ctx: Context) -> String {
    let inner = normalize(trim_block(&convert_children(
        node,
        ctx.with_list_item(false),
    )));
    if inner.is_empty() {
        return String::new();
    }

    let quoted: Vec<String> = inner
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect();
    format!("\n\n{}\n\n", quoted.join("\n"))
}

fn convert_list(node: &Handle, ordered: bool, ctx: Context) -> String {
    let start = if ordered {
        attr(node, "start").and_then(|s| list_start(&s)).unwrap_or(1)
    } else {
        1
    };

    let item_ctx = ctx.with_list_item(true);
    let mut items: Vec<String> = Vec::new();

    for child in node.children.borrow().iter() {
        match element_name(child).as_deref() {
            Some("li") => items.push(convert_children(child, item_ctx)),
            // A list nested directly in a list belongs to the previous item
            Some("ul") | Some("ol") if !items.is_empty() => {
                let nested = convert_node(child, item_ctx);
                if let Some(last) = items.last_mut() {
                    push_piece(last, &nested);
                }
            }
            _ => {
                let piece = convert_node(child, item_ctx);
                if !trim_block(&piece).is_empty() {
                    match items.last_mut() {
                        Some(last) => push_piece(last, &piece),
                        None => items.push(piece),
                    }
                }
            }
        }
    }

    if items.is_empty() {
        return String::new();
    }

    // Every marker must stay within nine digits to still read as a list item
    let start = start.min(MAX_LIST_ORDINAL.saturating_sub(items.len() - 1));

    let rendered: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let marker = if ordered {
                format!("{}. ", start.saturating_add(i))
            } else {
                "- ".to_string()
            };
            list_item(&marker, &normalize(trim_block(content)))
        })
        .collect();

    let loose = rendered.iter().any(|item| item.contains("\n\n"));
    let body = rendered.join(if loose { "\n\n" } else { "\n" });

    if ctx.in_list_item {
        format!("\n{}\n", body)
    } else {
        format!("\n\n{}\n\n", body)
    }
}

/// Parses a `start` attribute; digit strings too large for `usize` saturate.
fn list_start(value: &str) -> Option<usize> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(value.parse::<usize>().unwrap_or(MAX_LIST_ORDINAL))
}

/// Prefixes the first line with `marker` and indents the rest under its content.
fn list_item(marker: &str, content: &str) -> String {
    if content.is_empty() {
        return marker.trim_end().to_string();
    }

    let indent = " ".repeat(marker.len());
    let mut lines = content.split('\n');
    let mut out = format!("{}{}", marker, lines.next().unwrap_or_default());
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&indent);
            out.push_str(line);
        }
    }
    out
}

fn convert_table_row(node: &Handle, ctx: Context) -> String {
    let cells: Vec<String> = node
        .children
        .borrow()
        .iter()
        .filter(|c| matches!(element_name(c).as_deref(), Some("th") | Some("td")))
        .map(|c| single_line(&convert_children(c, ctx)))
        .collect();

    let row = cells.join(" | ");
    block(&row)
}

// ===========================================
// DOM accessors
// ===========================================

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Concatenated text of all descendants, skipping discarded elements.
///
/// Iterative so arbitrarily deep input cannot exhaust the stack.
fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();

    while let Some(current) = stack.pop() {
        match &current.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. } => {
                let tag: &str = &name.local;
                if DISCARDED.contains(&tag) {
                    continue;
                }
                if tag == "br" {
                    out.push('\n');
                }
                stack.extend(current.children.borrow().iter().rev().cloned());
            }
            _ => {}
        }
    }
    out
}
