//! Service Adapters
//!
//! Concrete implementations of the ports.

pub mod piston;

pub use piston::{PistonConfig, PistonExecutor};
