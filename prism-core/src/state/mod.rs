//! State machine engine
//!
//! A machine is a [`StateHandler`] plus the identifier of its current state.
//! The handler decides, per event, whether to request a transition; the engine
//! performs it before [`StateMachine::process`] returns, delivering an exit
//! event to the old state and an enter event to the new one.

pub mod machine;

pub use machine::{StateHandler, StateMachine, Transition};
