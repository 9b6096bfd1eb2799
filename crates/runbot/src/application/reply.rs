//! Reply rendering
//!
//! Turns execution results and rejections into the messages posted back
//! to the channel.

use tracing::error;

use crate::domain::entities::FENCE;
use crate::domain::errors::{ExecutionError, RequestError};
use crate::domain::services::{
    chunk, crop_notice, Cropper, LanguageRegistry, CROP_NOTICE_BASE_LEN,
};
use crate::domain::value_objects::OutputMode;

/// Header of a cropped output response
pub const OUTPUT_HEADER: &str = "Received Output:";

/// Header of a backend failure response
pub const ERROR_HEADER: &str = "Encountered Error:";

/// Smallest message limit every reply shape fits under: the longer header
/// template plus a crop notice for up to ten-digit counts.
pub const MIN_MESSAGE_LIMIT: usize = 64;

/// Suffix marking text shortened to fit a message
const TRUNCATION_MARK: &str = "...";

/// Ordered messages answering one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    messages: Vec<String>,
}

impl Reply {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self::new(vec![message.into()])
    }

    /// Messages in delivery order
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Characters `"{header}\n```\n" + "\n```\n"` adds around a payload
pub fn template_overhead(header: &str) -> usize {
    header.chars().count() + 1 + FENCE.len() + 1 + 1 + FENCE.len() + 1
}

/// One fenced message under `header`, cropped to `limit`.
pub fn render_cropped(header: &str, output: &str, limit: usize, cropper: &Cropper) -> String {
    let cropped = cropper.crop_to_fit(output, template_overhead(header), limit);
    let mut message = format!("{header}\n{FENCE}\n{}\n{FENCE}\n", cropped.text);
    if cropped.is_cropped() {
        message.push_str(&crop_notice(cropped.dropped));
    }
    message
}

/// Render successful output in the configured display mode.
pub fn render_output(output: &str, mode: OutputMode, limit: usize, cropper: &Cropper) -> Reply {
    match mode {
        OutputMode::Crop => Reply::single(render_cropped(OUTPUT_HEADER, output, limit, cropper)),
        OutputMode::Chunk => match chunk(output, limit) {
            Ok(fragments) => Reply::new(fragments.iter().map(|f| f.text()).collect()),
            Err(err) => {
                error!(error = %err, limit = limit, "Chunking rejected the limit, cropping instead");
                Reply::single(render_cropped(OUTPUT_HEADER, output, limit, cropper))
            }
        },
    }
}

/// Render a backend failure verbatim inside a fence.
pub fn render_execution_error(err: &ExecutionError, limit: usize, cropper: &Cropper) -> Reply {
    Reply::single(render_cropped(ERROR_HEADER, &err.to_string(), limit, cropper))
}

/// Render a rejected message, with a hint of supported languages when the
/// language was not recognised and `list_languages` is set.
pub fn render_rejection(
    err: &RequestError,
    registry: &LanguageRegistry,
    list_languages: bool,
    limit: usize,
) -> Reply {
    let message = rejection_text(err, limit);
    let wants_hint = matches!(
        err,
        RequestError::UnsupportedLanguage(_) | RequestError::MissingLanguage
    );

    if !(wants_hint && list_languages) || registry.is_empty() {
        return Reply::single(message);
    }

    let budget = limit.saturating_sub(message.chars().count() + 1);
    match supported_languages_hint(registry, budget) {
        Some(hint) => Reply::single(format!("{message}\n{hint}")),
        None => Reply::single(message),
    }
}

/// Rejection text strictly below `limit` characters.
///
/// An unsupported tag is echoed back shortened to what fits; any other
/// text that is still too long is cut.
fn rejection_text(err: &RequestError, limit: usize) -> String {
    let message = err.to_string();
    let len = message.chars().count();
    if len < limit {
        return message;
    }

    if let RequestError::UnsupportedLanguage(tag) = err {
        let fixed = len - tag.chars().count();
        let room = limit.saturating_sub(fixed + TRUNCATION_MARK.len() + 1);
        let mut short: String = tag.chars().take(room).collect();
        short.push_str(TRUNCATION_MARK);

        let message = RequestError::UnsupportedLanguage(short).to_string();
        if message.chars().count() < limit {
            return message;
        }
    }

    message.chars().take(limit.saturating_sub(1)).collect()
}

/// `"Supported languages: a, b, c"`, truncated with `...` to stay below
/// `budget` characters. `None` when not even one name fits.
pub fn supported_languages_hint(registry: &LanguageRegistry, budget: usize) -> Option<String> {
    const PREFIX: &str = "Supported languages: ";
    const ELLIPSIS: &str = ", ...";

    let mut hint = String::from(PREFIX);
    let mut listed = 0;
    let total = registry.len();

    for name in registry.names() {
        let separator = if listed == 0 { "" } else { ", " };
        let remaining_after = total - listed - 1;
        let reserve = if remaining_after > 0 { ELLIPSIS.len() } else { 0 };
        let needed = hint.chars().count() + separator.len() + name.chars().count() + reserve;
        if needed >= budget {
            break;
        }
        hint.push_str(separator);
        hint.push_str(name);
        listed += 1;
    }

    if listed == 0 {
        return None;
    }
    if listed < total {
        hint.push_str(ELLIPSIS);
    }
    Some(hint)
}
