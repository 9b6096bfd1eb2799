//! Language Entry
//!
//! One supported language: its canonical name plus user-facing aliases.

use serde::{Deserialize, Serialize};

/// A language known to the execution backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Canonical name sent to the backend
    pub name: String,
    /// Alternative names users may type (compared case-insensitively)
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Backend-reported version, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl LanguageEntry {
    /// Create an entry without aliases
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            version: None,
        }
    }

    /// Set aliases
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the backend version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Whether `tag` is this entry's canonical name
    pub fn is_named(&self, tag: &str) -> bool {
        eq_ignore_case(&self.name, tag)
    }

    /// Whether `tag` is one of this entry's aliases
    pub fn has_alias(&self, tag: &str) -> bool {
        self.aliases.iter().any(|alias| eq_ignore_case(alias, tag))
    }
}

/// Unicode-aware case-insensitive comparison without allocating.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
