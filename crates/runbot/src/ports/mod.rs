//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the pipeline talks to the
//! execution backend.
//!
//! Implementations live in `services/` or in downstream crates.

mod executor;

pub use executor::*;
