//! Meridian Runtime - Dashboard orchestration and the ticking loop
//!
//! Each tick runs the same pipeline:
//! 1. Refresh real time in the offset clock
//! 2. Derive the effective instant (real time + offset)
//! 3. Derive display facts for every registered zone
//! 4. Resolve each zone's day context against the viewer's date
//! 5. Detect minute changes and schedule their highlight timers
//! 6. Assemble the render model

pub mod config;
pub mod dashboard;
pub mod logging;
pub mod lookup;
pub mod service;
pub mod timers;

pub use config::*;
pub use dashboard::*;
pub use logging::*;
pub use lookup::*;
pub use service::*;
pub use timers::*;
