//! User input drivers
//!
//! Both drivers observe pin-change interrupts, re-read their pins on every
//! notification and publish an event only when the level pattern actually
//! changed. A port interrupt fires for any pin on the port, so most
//! notifications are for someone else.

pub mod button;
pub mod encoder;

pub use button::Button;
pub use encoder::RotaryEncoder;
