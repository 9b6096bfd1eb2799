//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn conflict<T: AsRef<str>>(what: T, name: &str) -> Self {
        Self::Conflict(format!("{} '{}' is defined more than once", what.as_ref(), name))
    }
}

/// Reasons an incoming message is rejected before anything is executed.
///
/// The `Display` text is what the user sees in the channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Invalid input: too few lines")]
    TooFewLines,

    #[error("Invalid input: you must put code in code blocks")]
    NotCodeBlock,

    #[error("Invalid input: do you have any code?")]
    EmptyCode,

    #[error("Invalid input: please specify a language after the opening ```")]
    MissingLanguage,

    #[error("Invalid input: language '{0}' is not supported")]
    UnsupportedLanguage(String),
}

/// Failures reported by the execution backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("failed to parse backend response: {0}")]
    ParseError(String),

    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by the execution backend")]
    RateLimited,

    #[error("compile error:\n{0}")]
    Compile(String),

    #[error("execution timed out")]
    Timeout,
}
