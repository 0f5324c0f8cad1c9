//! Text-level helpers: whitespace, escaping, code fences, normalization.

/// Placeholder for a hard line break while blocks are still being assembled.
///
/// Lets block trimming drop breaks at block edges without confusing them
/// with an escaped backslash in the text. Replaced by `\` in [`finish`].
pub(crate) const HARD_BREAK: char = '\u{E000}';

/// Collapses every run of whitespace to a single space.
///
/// Non-breaking spaces count as whitespace; stray placeholder characters
/// from the input are dropped.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c == HARD_BREAK {
            continue;
        }
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Backslash-escapes characters Markdown would otherwise interpret.
pub(crate) fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' | '*' | '_' | '`' | '[' | ']' => {
                out.push('\\');
                out.push(c);
            }
            // Only where it could open an inline HTML tag
            '<' if chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?')) =>
            {
                out.push_str("\\<");
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escapes the character that would make a line of text open a block.
///
/// Covers ATX headings, block quotes, bullets, setext underlines and tilde
/// fences. For ordered list markers the delimiter after the digits is
/// escaped instead (`2024.` becomes `2024\.`). Leading spaces are kept.
pub(crate) fn escape_line_start(text: &str) -> String {
    let body = text.trim_start_matches(' ');
    let lead = &text[..text.len() - body.len()];
    match body.chars().next() {
        Some('#' | '>' | '-' | '+' | '=' | '~') => format!("{lead}\\{body}"),
        Some(c) if c.is_ascii_digit() => {
            let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if body[digits..].starts_with(['.', ')']) {
                format!("{lead}{}\\{}", &body[..digits], &body[digits..])
            } else {
                text.to_string()
            }
        }
        _ => text.to_string(),
    }
}

/// Length of the longest run of backticks in `text`.
fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Wraps text in an inline code span whose fence outlasts any backticks inside.
pub(crate) fn code_span(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let fence = "`".repeat(longest_backtick_run(text) + 1);
    let pad = if text.starts_with('`') || text.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{text}{pad}{fence}")
}

/// Returns a code block fence of at least three backticks that `code` cannot close.
pub(crate) fn block_fence(code: &str) -> String {
    "`".repeat((longest_backtick_run(code) + 1).max(3))
}

/// Trims whitespace and pending hard breaks from both ends of a block.
pub(crate) fn trim_block(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == HARD_BREAK)
}

/// Joins a block's lines into one, as required for headings and table cells.
pub(crate) fn single_line(text: &str) -> String {
    let joined: String = trim_block(text)
        .chars()
        .map(|c| if c == '\n' || c == HARD_BREAK { ' ' } else { c })
        .collect();
    collapse_whitespace(&joined).trim().to_string()
}

/// Strips quote markers, indentation and one list marker from the start of a line.
fn line_body(line: &str) -> &str {
    let t = line.trim_start_matches([' ', '>']);
    if let Some(rest) = t.strip_prefix("- ") {
        return rest.trim_start();
    }
    let digits = t.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && t[digits..].starts_with(". ") {
        return t[digits + 2..].trim_start();
    }
    t
}

fn opening_fence(line: &str) -> Option<usize> {
    let n = line_body(line).chars().take_while(|&c| c == '`').count();
    (n >= 3).then_some(n)
}

fn closes_fence(line: &str, open: usize) -> bool {
    let t = line.trim_start_matches([' ', '>']).trim();
    t.len() >= open && t.chars().all(|c| c == '`')
}

/// Normalizes whitespace outside code blocks.
///
/// Trims trailing whitespace from every line, collapses runs of blank lines
/// to one, and drops leading and trailing blank lines. Lines inside fenced
/// code blocks are kept verbatim.
pub(crate) fn normalize(markdown: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fence: Option<usize> = None;
    let mut pending_blank = false;

    for line in markdown.split('\n') {
        if let Some(open) = fence {
            if closes_fence(line, open) {
                fence = None;
                out.push(line.trim_end());
            } else {
                out.push(line);
            }
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push("");
            pending_blank = false;
        }
        fence = opening_fence(line);
        out.push(line);
    }

    out.join("\n")
}

/// Final pass over a whole document: normalize, then materialize hard breaks.
pub(crate) fn finish(markdown: &str) -> String {
    let normalized = normalize(trim_block(markdown));
    normalized.replace(HARD_BREAK, "\\")
}
