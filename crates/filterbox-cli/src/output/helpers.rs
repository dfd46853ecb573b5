//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Formats a section header.
pub fn header(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.green().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Dims secondary text such as table headings.
pub fn dim(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Shows `query` with a caret under the byte offset `position`.
///
/// The caret column counts characters, so it lines up under multi-byte
/// input too. Offsets past the end point just after the last character.
pub fn format_error_caret(query: &str, position: usize, use_colors: bool) -> String {
    let mut position = position.min(query.len());
    while !query.is_char_boundary(position) {
        position -= 1;
    }
    let column = query[..position].chars().count();
    let caret = "^";
    let caret = if use_colors {
        caret.red().bold().to_string()
    } else {
        caret.to_string()
    };
    format!("  {query}\n  {}{caret}\n", " ".repeat(column))
}
