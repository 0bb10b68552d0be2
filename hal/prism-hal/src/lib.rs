//! Prism Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware traits the event core is written
//! against. Board crates implement them on top of their chip HAL, host tests
//! implement them with plain structs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (prism-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  prism-core / prism-drivers             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  prism-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`serial::ByteSource`], [`serial::ByteSink`] - Byte-level serial pipe
//! - [`irq::InterruptSource`], [`irq::PinChangeSource`] - Interrupt enable control
//! - [`power::PowerRegistrar`] - Peripheral power bookkeeping

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod irq;
pub mod power;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin, PinId};
pub use irq::{InterruptSource, PinChangeSource};
pub use power::{Peripheral, PowerRegistrar};
pub use serial::{ByteSink, ByteSource, RxFlags, SerialPort};
