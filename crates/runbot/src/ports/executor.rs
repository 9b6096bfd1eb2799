//! Code Execution Port
//!
//! Abstract interface for the remote execution backend.

use async_trait::async_trait;

use crate::domain::entities::{ExecutionOutput, LanguageEntry};
use crate::domain::errors::ExecutionError;

/// Remote code execution
///
/// Sandboxing, resource limits and timeouts are the backend's business.
/// One call per request, no retries.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Run `code` as `language` (a canonical registry name)
    async fn run(&self, language: &str, code: &str) -> Result<ExecutionOutput, ExecutionError>;

    /// Get the backend name (e.g., "piston")
    fn name(&self) -> &str;
}

/// Source of the language registry
#[async_trait]
pub trait RuntimeCatalog: Send + Sync {
    /// List installed runtimes, in catalog order
    async fn runtimes(&self) -> Result<Vec<LanguageEntry>, ExecutionError>;
}
