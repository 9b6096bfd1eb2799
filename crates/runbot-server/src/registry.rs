//! Language registry loading
//!
//! Fetched once at startup and shared read-only afterwards.

use anyhow::{Context, Result};
use tracing::{info, warn};

use runbot::{LanguageRegistry, RuntimeCatalog};

use crate::config::RegistrySource;

/// Build the registry from `source`.
///
/// An unreachable catalog falls back to the builtin list. A catalog that is
/// reachable but inconsistent (e.g. two languages sharing an alias) is a
/// startup error.
pub async fn load_registry<C>(source: RegistrySource, catalog: &C) -> Result<LanguageRegistry>
where
    C: RuntimeCatalog + ?Sized,
{
    if source == RegistrySource::Builtin {
        let registry = LanguageRegistry::builtin();
        info!(languages = registry.len(), "Using builtin language list");
        return Ok(registry);
    }

    let runtimes = match catalog.runtimes().await {
        Ok(runtimes) => runtimes,
        Err(e) => {
            warn!(error = %e, "Failed to fetch runtimes - falling back to builtin language list");
            return Ok(LanguageRegistry::builtin());
        }
    };

    let registry =
        LanguageRegistry::from_catalog(runtimes).context("Runtime catalog is inconsistent")?;
    info!(languages = registry.len(), "Loaded runtime catalog");
    Ok(registry)
}
