//! Output Fragment
//!
//! One size-bounded, independently deliverable piece of a reply.

use std::fmt;

/// Fence marker used both for inbound code blocks and outbound fragments
pub const FENCE: &str = "```";

/// Characters a fragment adds around its payload: "```\n" + "\n```"
pub const FRAGMENT_OVERHEAD: usize = 8;

/// A fenced slice of execution output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFragment {
    payload: String,
}

impl OutputFragment {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Raw output carried by this fragment
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Display-ready text, payload wrapped in a fence
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutputFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{FENCE}\n{}\n{FENCE}", self.payload)
    }
}
