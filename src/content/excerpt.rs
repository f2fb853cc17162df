//! Excerpt generation module
//!
//! Produces short plain-text summaries of Markdown/MDX bodies for listings and
//! meta descriptions.

use regex::Regex;
use std::sync::OnceLock;

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 160;

/// Marker appended when an excerpt is cut at a word boundary
pub const ELLIPSIS: &str = "...";

const WORDS_PER_MINUTE: usize = 200;

struct MarkdownPatterns {
    heading: Regex,
    bold: Regex,
    italic: Regex,
    link: Regex,
    code_block: Regex,
    inline_code: Regex,
    newlines: Regex,
}

fn patterns() -> &'static MarkdownPatterns {
    static PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkdownPatterns {
        heading: Regex::new(r"#{1,6}\s+").expect("valid heading pattern"),
        bold: Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold pattern"),
        italic: Regex::new(r"\*([^*]+)\*").expect("valid italic pattern"),
        link: Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link pattern"),
        code_block: Regex::new(r"```[^`]*```").expect("valid code block pattern"),
        inline_code: Regex::new(r"`([^`]+)`").expect("valid inline code pattern"),
        newlines: Regex::new(r"[\r\n]+").expect("valid newline pattern"),
    })
}

/// Reduce Markdown to plain text on a single line
///
/// Heading markers and code blocks are removed; bold, italic, links and inline
/// code are unwrapped to their text. Plain text without markup, line breaks or
/// surrounding whitespace comes back unchanged.
pub fn strip_markdown(text: &str) -> String {
    let p = patterns();
    let text = p.heading.replace_all(text, "");
    let text = p.bold.replace_all(&text, "$1");
    let text = p.italic.replace_all(&text, "$1");
    let text = p.link.replace_all(&text, "$1");
    let text = p.code_block.replace_all(&text, "");
    let text = p.inline_code.replace_all(&text, "$1");
    let text = p.newlines.replace_all(&text, " ");
    text.trim().to_string()
}

/// Generate an excerpt of at most `max_length` characters (plus ellipsis)
///
/// Prefers ending on a sentence terminator found past 70% of the window;
/// otherwise cuts at the last whitespace and appends [`ELLIPSIS`].
pub fn generate_excerpt(text: &str, max_length: usize) -> String {
    let plain = strip_markdown(text);
    let chars: Vec<char> = plain.chars().collect();
    if chars.len() <= max_length {
        return plain;
    }

    let window = &chars[..max_length];
    if let Some(end) = window.iter().rposition(|c| matches!(c, '.' | '!' | '?')) {
        if end * 10 > max_length * 7 {
            return chars[..=end].iter().collect();
        }
    }

    let cut = window
        .iter()
        .rposition(|c| c.is_whitespace())
        .unwrap_or(0);
    let mut excerpt: String = chars[..cut].iter().collect();
    excerpt.push_str(ELLIPSIS);
    excerpt
}

/// Estimated reading time in whole minutes, at least one
pub fn calculate_read_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE).max(1)).unwrap_or(u32::MAX)
}
