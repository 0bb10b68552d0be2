//! Board pin assignment
//!
//! Which GPIO drives which function. Pin numbers are physical GPIO numbers;
//! the pin-change port of each is derived from the number.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;
use crate::interrupts::ports::PIN_COUNT;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Active-high pin without pull-up
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Active-low pin with pull-up, as for a switch to ground
    pub const fn active_low(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Pins used by the controller board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardPins {
    /// Front buttons 1 to 3
    pub buttons: [PinConfig; 3],
    /// Rotary encoder channel A
    pub encoder_a: PinConfig,
    /// Rotary encoder channel B
    pub encoder_b: PinConfig,
    /// Rotary encoder push switch
    pub encoder_button: PinConfig,
    /// Feedback LED red, green, blue
    pub feedback: [PinConfig; 3],
}

impl BoardPins {
    /// Every pin, in field order
    pub fn all(&self) -> [PinConfig; 9] {
        [
            self.buttons[0],
            self.buttons[1],
            self.buttons[2],
            self.encoder_a,
            self.encoder_b,
            self.encoder_button,
            self.feedback[0],
            self.feedback[1],
            self.feedback[2],
        ]
    }

    /// Check pins are in range and distinct
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut used = 0u32;
        for pin in self.all() {
            if usize::from(pin.pin) >= PIN_COUNT || used & (1 << pin.pin) != 0 {
                return Err(ConfigError::InvalidPin);
            }
            used |= 1 << pin.pin;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardPins {
        BoardPins {
            buttons: [
                PinConfig::active_low(2),
                PinConfig::active_low(3),
                PinConfig::active_low(4),
            ],
            encoder_a: PinConfig::active_low(5),
            encoder_b: PinConfig::active_low(6),
            encoder_button: PinConfig::active_low(7),
            feedback: [PinConfig::new(16), PinConfig::new(17), PinConfig::new(18)],
        }
    }

    #[test]
    fn test_valid_board() {
        assert_eq!(board().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_pin() {
        let mut pins = board();
        pins.encoder_b = PinConfig::new(16);
        assert_eq!(pins.validate(), Err(ConfigError::InvalidPin));
    }

    #[test]
    fn test_pin_out_of_range() {
        let mut pins = board();
        pins.feedback[2] = PinConfig::new(30);
        assert_eq!(pins.validate(), Err(ConfigError::InvalidPin));
    }
}
