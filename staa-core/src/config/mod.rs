//! Configuration types
//!
//! Board-agnostic leveler settings. The host deserializes these from its
//! config file when the `serde` feature is enabled.

pub mod types;

pub use types::*;
