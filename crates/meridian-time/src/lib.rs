//! Meridian Time Engine - Time-travel clock and per-zone derivation
//!
//! This crate implements the time side of the dashboard:
//! - Time sources (system clock, manually driven clock)
//! - Local wall-clock formatting per IANA zone
//! - Per-zone display facts (digits, day/night, windows, GMT offset)
//! - Relative day context against the viewer's calendar date
//! - The offset clock that turns real time into the effective instant

pub mod clock;
pub mod day_context;
pub mod format;
pub mod label;
pub mod source;
pub mod zone_clock;

pub use clock::*;
pub use day_context::*;
pub use format::*;
pub use label::*;
pub use source::*;
pub use zone_clock::*;
