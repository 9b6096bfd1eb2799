//! Code-Block Extractor
//!
//! Classifies a chat message as a fenced code block and pulls out the
//! language tag and the code between the fences.

use crate::domain::entities::{ParsedMessage, FENCE};

/// Classify `message` as a fenced code block.
///
/// A code message has at least two lines, a first line starting with the
/// fence marker and a last line that is exactly the fence marker. Anything
/// else is reported as not code; this never fails.
pub fn extract(message: &str) -> ParsedMessage {
    let normalized = normalize_newlines(message);
    let lines: Vec<&str> = normalized.split('\n').collect();
    extract_lines(&lines)
}

/// Same as [`extract`] on a message already split into LF-separated lines.
pub fn extract_lines(lines: &[&str]) -> ParsedMessage {
    let [first, .., last] = lines else {
        return ParsedMessage::not_code();
    };

    let Some(tag) = first.strip_prefix(FENCE) else {
        return ParsedMessage::not_code();
    };
    if *last != FENCE {
        return ParsedMessage::not_code();
    }

    let body = lines[1..lines.len() - 1].join("\n");
    ParsedMessage::code(tag.trim(), body)
}

/// CRLF to LF
pub fn normalize_newlines(message: &str) -> String {
    message.replace("\r\n", "\n")
}
