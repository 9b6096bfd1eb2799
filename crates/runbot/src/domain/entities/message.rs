//! Parsed Message
//!
//! Result of classifying one inbound chat message.

/// Classification of a chat message as a fenced code block.
///
/// `raw_tag` and `body` are only meaningful when `is_code_message` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    pub is_code_message: bool,
    /// Text after the opening fence, empty when no language was given
    pub raw_tag: String,
    /// Lines between the fences, joined with `\n`
    pub body: String,
}

impl ParsedMessage {
    /// A message that is not a fenced code block
    pub fn not_code() -> Self {
        Self::default()
    }

    /// A fenced code block
    pub fn code(raw_tag: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            is_code_message: true,
            raw_tag: raw_tag.into(),
            body: body.into(),
        }
    }

    pub fn has_tag(&self) -> bool {
        !self.raw_tag.is_empty()
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}
