//! Domain Services
//!
//! Stateless parsing and formatting operations.

mod chunker;
mod command;
mod cropper;
mod extractor;
mod registry;

pub use chunker::*;
pub use command::*;
pub use cropper::*;
pub use extractor::*;
pub use registry::*;
