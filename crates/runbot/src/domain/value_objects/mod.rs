//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod output_mode;

pub use output_mode::*;
