//! Board-agnostic event core for the RGB controller firmware
//!
//! This crate contains everything between the interrupt vectors and the
//! application logic that does not depend on a specific chip:
//!
//! - Interrupt-safe event queue
//! - Subject/observer dispatch and the interrupt multiplexers built on it
//! - State machine engine with enter/exit semantics
//! - Serial link binding the frame codec to a byte pipe
//! - Peripheral power bookkeeping
//! - Configuration type definitions
//! - Controller state machine driving the remote node
//!
//! # Dispatch
//!
//! ```text
//!  edge / tick / byte
//!          │
//!          ▼
//!  ┌───────────────┐   PinObserver   ┌─────────┐  EventObserver  ┌────────────┐
//!  │ interrupt mux │ ──────────────► │ driver  │ ──────────────► │ EventQueue │
//!  └───────────────┘                 └─────────┘                 └────────────┘
//!                                                                      │
//!                                                     main loop        ▼
//!                                                              ┌──────────────┐
//!                                                              │ StateMachine │
//!                                                              └──────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod interrupts;
pub mod link;
pub mod observer;
pub mod power;
pub mod queue;
pub mod state;
pub mod sync;

pub use error::Error;
pub use prism_protocol::{Event, EventKind, HardwareId};
pub use queue::EventQueue;
pub use state::{StateHandler, StateMachine, Transition};
