//! Interrupt source control
//!
//! The interrupt multiplexers own the decision of when a hardware interrupt is
//! needed; these traits are how they switch it on and off.

/// An interrupt vector that can be switched on and off
pub trait InterruptSource {
    /// Clear any pending request and enable the vector
    fn enable(&mut self);

    /// Disable the vector
    fn disable(&mut self);
}

/// A pin-change interrupt vector shared by the pins of one port
///
/// Each pin additionally has its own mask bit; the vector fires only for
/// unmasked pins.
pub trait PinChangeSource: InterruptSource {
    /// Let changes on `bit` raise the port interrupt
    fn unmask(&mut self, bit: u8);

    /// Stop changes on `bit` from raising the port interrupt
    fn mask(&mut self, bit: u8);
}
