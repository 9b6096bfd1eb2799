//! Runbot Core Library
//!
//! Turns chat messages containing fenced code blocks into execution
//! requests, and execution output back into chat-sized replies.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure parsing and formatting logic
//!   - `entities/`: Language entries, parsed messages, requests, fragments
//!   - `value_objects/`: Immutable value types (OutputMode)
//!   - `services/`: Extractor, command parser, registry, chunker, cropper
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `executor`: Remote code execution and runtime catalog
//!
//! - **Services** (`services/`): Concrete adapters (Piston HTTP API)
//!
//! - **Application** (`application/`): The run pipeline used by every
//!   transport
//!
//! # Usage
//!
//! ```rust,ignore
//! use runbot::{LanguageRegistry, RunService, RunSettings};
//! use runbot::services::PistonExecutor;
//!
//! let registry = Arc::new(LanguageRegistry::builtin());
//! let executor = Arc::new(PistonExecutor::new(PistonConfig::default())?);
//! let service = RunService::new(registry, executor, RunSettings::default())?;
//!
//! if let Some(reply) = service.handle("```python\nprint(1)\n```").await {
//!     for message in reply.messages() { /* send */ }
//! }
//! ```

pub mod application;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use application::{Reply, RunService, RunSettings};
pub use domain::{
    chunk, crop_to_fit, extract, parse_command, Cropped, Cropper, DomainError, ExecutionError,
    ExecutionOutput, LanguageEntry, LanguageRegistry, OutputFragment, OutputMode, ParsedMessage,
    RequestError, ResolvedRequest, RunCommand,
};
pub use ports::{CodeExecutor, RuntimeCatalog};
