//! Meridian Core - Fundamental types for the world-clock dashboard
//!
//! This crate defines the types shared by every other Meridian crate:
//! - Identifiers (EntryId)
//! - Zone entries, search results and the display format
//! - The default zone set and the selectable zone catalog
//! - Error types and serde helpers

pub mod catalog;
pub mod error;
pub mod id;
pub mod serde_helpers;
pub mod zone;

pub use catalog::*;
pub use error::*;
pub use id::*;
pub use zone::*;
