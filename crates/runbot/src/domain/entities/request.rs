//! Execution Request / Output
//!
//! What is handed to the execution backend, and what comes back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message that passed parsing and language resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Correlates log lines for one request
    pub id: Uuid,
    /// Canonical language name
    pub language: String,
    pub code: String,
}

impl ResolvedRequest {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            language: language.into(),
            code: code.into(),
        }
    }
}

/// Successful result of one backend call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    /// Captured output (stdout and stderr interleaved), may be empty
    pub output: String,
    /// Language version that actually ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ExecutionOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}
