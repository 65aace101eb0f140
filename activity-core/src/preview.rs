//! Bounded payload previews.
//!
//! Audit lines for detail fetches include a JSON preview of the payload,
//! cut at a character budget so the log cannot grow without bound.

use serde::Serialize;

/// Compact JSON of `value`, truncated to `max_chars` characters.
pub fn preview<T: Serialize + ?Sized>(value: &T, max_chars: usize) -> String {
    match serde_json::to_string(value) {
        Ok(json) => truncate(&json, max_chars),
        Err(e) => format!("<unserializable: {e}>"),
    }
}

/// Cut `text` after `max_chars` characters, noting how much was dropped.
///
/// Cuts on character boundaries, never inside a multi-byte sequence.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let dropped = text[cut..].chars().count();
            format!("{}... (+{} chars)", &text[..cut], dropped)
        }
        None => text.to_string(),
    }
}
