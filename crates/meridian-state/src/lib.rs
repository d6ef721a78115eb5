//! Meridian State - Zone registry and transition tracking
//!
//! This crate implements the mutable state of the dashboard:
//! - Key-value snapshot stores (memory, file)
//! - The ordered zone registry with persistence on every mutation
//! - Per-zone minute change detection for transition highlighting

pub mod registry;
pub mod store;
pub mod transition;

pub use registry::*;
pub use store::*;
pub use transition::*;
