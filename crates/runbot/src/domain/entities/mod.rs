//! Domain Entities
//!
//! Short-lived values that flow through one request/response cycle.

mod fragment;
mod language;
mod message;
mod request;

pub use fragment::*;
pub use language::*;
pub use message::*;
pub use request::*;
