//! GPIO pin abstractions
//!
//! Digital input and output pins as seen by the drivers. Pins are read and
//! written from interrupt context, so every method is a single register access
//! on real hardware. Reads take `&mut self` like `embedded-hal` 1.0, so its
//! pins can be wrapped without interior mutability.

/// Physical pin number on the package
///
/// The mapping from pin number to interrupt port and bit lives with the
/// interrupt multiplexers, not with the pin itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

impl PinId {
    /// Raw pin number
    pub const fn number(self) -> u8 {
        self.0
    }
}

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Invert the driven level
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Drive the pin to `high`
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Level currently being driven
    fn is_set_high(&mut self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}
