//! Hardware driver implementations
//!
//! This crate turns raw pins and bytes into [`Event`](prism_core::Event)s
//! and drives the feedback LEDs:
//!
//! - Push buttons and the rotary encoder (pin-change observers)
//! - Software PWM LED channels (tick observers)
//! - Interrupt-driven UART receive buffer
//! - Adapters from `embedded-hal` 1.0 pins to the `prism-hal` traits

#![no_std]
#![deny(unsafe_code)]

pub mod input;
pub mod led;
pub mod pin;
pub mod uart;

pub use input::{Button, RotaryEncoder};
pub use led::{Polarity, PwmChannel};
pub use pin::{EhInput, EhOutput};
pub use uart::{UartReader, UartReceiver};
