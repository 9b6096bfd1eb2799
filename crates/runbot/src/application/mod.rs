//! Application Layer
//!
//! The run pipeline shared by every transport.

pub mod reply;
mod run_service;

pub use reply::Reply;
pub use run_service::*;
