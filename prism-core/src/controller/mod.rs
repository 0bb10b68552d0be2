//! Controller application
//!
//! The controller's UI: three front buttons pick what to change on the node,
//! the rotary encoder changes it. Everything here runs in the main loop on
//! top of the [`StateMachine`](crate::state::StateMachine) engine.

pub mod machine;

pub use machine::{ControllerIo, ControllerState, FrontButton, RgbController};
