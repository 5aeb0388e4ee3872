//! Text helpers shared by the page parsers

use scraper::ElementRef;

/// Visible text of an element
///
/// Each text node is trimmed, empty nodes are dropped, and the rest are
/// joined with single spaces, so markup-induced whitespace never reaches
/// the dataset.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncates to at most `max_chars` characters, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Character count, as opposed to the byte length of `str::len`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
