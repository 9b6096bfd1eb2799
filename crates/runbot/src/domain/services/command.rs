//! Run Command Parser
//!
//! Handles the `!run <language>` form, where the language is a command
//! argument and the fenced block follows on the next lines:
//!
//! ~~~text
//! !run python
//! ```
//! print(1)
//! ```
//! ~~~

use crate::domain::errors::RequestError;
use crate::domain::services::extractor::{extract_lines, normalize_newlines};

/// Default command prefix
pub const DEFAULT_COMMAND_PREFIX: &str = "!run";

/// A recognised run command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    /// First argument after the prefix
    pub language: String,
    /// Any further arguments on the command line
    pub args: Vec<String>,
    /// Lines after the command line
    pub lines: Vec<String>,
}

/// Parse a message that starts with `prefix`.
///
/// Returns `None` when the message is not addressed to us: another first
/// word, or the prefix without a language argument.
pub fn parse_command(message: &str, prefix: &str) -> Option<RunCommand> {
    let normalized = normalize_newlines(message);
    let mut lines = normalized.split('\n');

    let mut words = lines.next()?.split_whitespace();
    if words.next()? != prefix {
        return None;
    }
    let language = words.next()?.to_string();
    let args = words.map(str::to_string).collect();

    Some(RunCommand {
        language,
        args,
        lines: lines.map(str::to_string).collect(),
    })
}

impl RunCommand {
    /// The code between the fences following the command line.
    pub fn code(&self) -> Result<String, RequestError> {
        match self.lines.len() {
            0 | 1 => Err(RequestError::TooFewLines),
            2 => Err(RequestError::EmptyCode),
            _ => {
                let lines: Vec<&str> = self.lines.iter().map(String::as_str).collect();
                let parsed = extract_lines(&lines);
                if !parsed.is_code_message {
                    return Err(RequestError::NotCodeBlock);
                }
                Ok(parsed.body)
            }
        }
    }
}
