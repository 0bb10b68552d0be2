//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware builds its
//! configuration from the defaults here plus the board's pin assignment and
//! validates it once at startup.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
