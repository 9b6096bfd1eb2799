//! Language Registry
//!
//! Ordered, validated set of supported languages and the resolver that maps
//! a user-supplied tag onto a canonical name.

use std::collections::HashMap;

use crate::domain::entities::LanguageEntry;
use crate::domain::errors::DomainError;

/// Languages accepted when no runtime catalog is available
pub const BUILTIN_LANGUAGES: &[&str] = &[
    "awk",
    "bash",
    "befunge93",
    "brainfuck",
    "c",
    "c++",
    "cjam",
    "clojure",
    "cobol",
    "coffeescript",
    "cow",
    "crystal",
    "csharp",
    "csharp.net",
    "d",
    "dart",
    "dash",
    "dragon",
    "elixir",
    "emacs",
    "erlang",
    "file",
    "forte",
    "fortran",
    "freebasic",
    "fsharp.net",
    "fsi",
    "go",
    "golfscript",
    "groovy",
    "haskell",
    "husk",
    "iverilog",
    "japt",
    "java",
    "javascript",
    "jelly",
    "julia",
    "kotlin",
    "lisp",
    "llvm_ir",
    "lolcode",
    "lua",
    "nasm",
    "nasm64",
    "nim",
    "ocaml",
    "octave",
    "osabie",
    "paradoc",
    "pascal",
    "perl",
    "php",
    "ponylang",
    "powershell",
    "prolog",
    "pure",
    "pyth",
    "python",
    "python2",
    "racket",
    "raku",
    "retina",
    "rockstar",
    "rscript",
    "ruby",
    "rust",
    "scala",
    "sqlite3",
    "swift",
    "typescript",
    "basic",
    "basic.net",
    "vlang",
    "vyxal",
    "yeethon",
    "zig",
];

/// Immutable registry of supported languages.
///
/// Iteration order is the construction order, and resolution is
/// deterministic: canonical names win over aliases, then the first entry
/// owning the alias.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    entries: Vec<LanguageEntry>,
}

impl LanguageRegistry {
    /// Build a registry, rejecting empty names, empty aliases, duplicate
    /// canonical names and aliases claimed by more than one entry.
    pub fn new(entries: Vec<LanguageEntry>) -> Result<Self, DomainError> {
        let mut names: HashMap<String, usize> = HashMap::new();
        let mut aliases: HashMap<String, usize> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "language #{} has an empty name",
                    index
                )));
            }
            if names.insert(entry.name.to_lowercase(), index).is_some() {
                return Err(DomainError::conflict("language", &entry.name));
            }

            for alias in &entry.aliases {
                if alias.trim().is_empty() {
                    return Err(DomainError::Validation(format!(
                        "language '{}' has an empty alias",
                        entry.name
                    )));
                }
                match aliases.insert(alias.to_lowercase(), index) {
                    Some(owner) if owner != index => {
                        return Err(DomainError::Conflict(format!(
                            "alias '{}' is claimed by both '{}' and '{}'",
                            alias, entries[owner].name, entry.name
                        )));
                    }
                    _ => {}
                }
            }
        }

        Ok(Self { entries })
    }

    /// Build a registry from a runtime catalog.
    ///
    /// Catalogs list one entry per installed version, so repeated languages
    /// collapse into their first occurrence before validation.
    pub fn from_catalog(catalog: Vec<LanguageEntry>) -> Result<Self, DomainError> {
        let mut entries: Vec<LanguageEntry> = Vec::with_capacity(catalog.len());
        for entry in catalog {
            if entries.iter().any(|known| known.is_named(&entry.name)) {
                tracing::debug!(
                    language = %entry.name,
                    version = ?entry.version,
                    "Skipping additional catalog version"
                );
                continue;
            }
            entries.push(entry);
        }
        Self::new(entries)
    }

    /// The static language list, without aliases
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_LANGUAGES
                .iter()
                .map(|name| LanguageEntry::new(*name))
                .collect(),
        }
    }

    /// Resolve a user-supplied tag to a canonical language name.
    ///
    /// Case-insensitive. An exact canonical name wins, then the first entry
    /// (in registry order) listing the tag as an alias. An empty tag never
    /// resolves.
    pub fn resolve(&self, tag: &str) -> Option<&str> {
        if tag.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| entry.is_named(tag))
            .or_else(|| self.entries.iter().find(|entry| entry.has_alias(tag)))
            .map(|entry| entry.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|entry| entry.is_named(name))
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Canonical names in registry order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> LanguageRegistry {
        LanguageRegistry::new(vec![
            LanguageEntry::new("javascript").with_aliases(["js", "node-javascript", "node"]),
            LanguageEntry::new("python").with_aliases(["py", "py3", "python3"]),
            LanguageEntry::new("python2").with_aliases(["py2"]),
            LanguageEntry::new("c++").with_aliases(["cpp", "g++"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_canonical_name() {
        let registry = sample_registry();
        assert_eq!(registry.resolve("python"), Some("python"));
        assert_eq!(registry.resolve("PyThOn"), Some("python"));
        assert_eq!(registry.resolve("C++"), Some("c++"));
    }

    #[test]
    fn test_resolve_every_alias() {
        let registry = sample_registry();
        for entry in registry.entries() {
            for alias in &entry.aliases {
                assert_eq!(registry.resolve(alias), Some(entry.name.as_str()));
                assert_eq!(
                    registry.resolve(&alias.to_uppercase()),
                    Some(entry.name.as_str())
                );
            }
        }
        assert_eq!(registry.resolve("py3"), Some("python"));
    }

    #[test]
    fn test_canonical_name_beats_alias() {
        // "python2" is an alias of the first entry but the name of the second
        let registry = LanguageRegistry::new(vec![
            LanguageEntry::new("python").with_aliases(["python2"]),
            LanguageEntry::new("python2"),
        ])
        .unwrap();
        assert_eq!(registry.resolve("python2"), Some("python2"));
    }

    #[test]
    fn test_unresolved_tags() {
        let registry = sample_registry();
        assert_eq!(registry.resolve(""), None);
        assert_eq!(registry.resolve("brainfuck"), None);
        assert_eq!(registry.resolve("pyt"), None);
        assert_eq!(registry.resolve(" python"), None);
    }

    #[test]
    fn test_alias_collision_is_rejected() {
        let result = LanguageRegistry::new(vec![
            LanguageEntry::new("javascript").with_aliases(["js"]),
            LanguageEntry::new("typescript").with_aliases(["JS"]),
        ]);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let result = LanguageRegistry::new(vec![
            LanguageEntry::new("python"),
            LanguageEntry::new("Python"),
        ]);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_empty_name_or_alias_is_rejected() {
        let result = LanguageRegistry::new(vec![LanguageEntry::new("")]);
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result = LanguageRegistry::new(vec![LanguageEntry::new("go").with_aliases([""])]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_repeated_alias_within_one_entry_is_fine() {
        let registry =
            LanguageRegistry::new(vec![LanguageEntry::new("ruby").with_aliases(["rb", "RB"])])
                .unwrap();
        assert_eq!(registry.resolve("rb"), Some("ruby"));
    }

    #[test]
    fn test_from_catalog_keeps_first_version() {
        let registry = LanguageRegistry::from_catalog(vec![
            LanguageEntry::new("python")
                .with_aliases(["py"])
                .with_version("3.10.0"),
            LanguageEntry::new("python")
                .with_aliases(["py"])
                .with_version("3.12.0"),
            LanguageEntry::new("go").with_version("1.16.2"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("python").and_then(|e| e.version.as_deref()),
            Some("3.10.0")
        );
        assert_eq!(registry.resolve("py"), Some("python"));
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let builtin = LanguageRegistry::builtin();
        assert_eq!(builtin.len(), BUILTIN_LANGUAGES.len());
        assert!(LanguageRegistry::new(builtin.entries().to_vec()).is_ok());
        assert_eq!(builtin.resolve("RUST"), Some("rust"));
        assert_eq!(builtin.names().next(), Some("awk"));
    }
}
