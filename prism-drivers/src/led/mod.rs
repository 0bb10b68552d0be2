//! LED outputs
//!
//! An [`Led`] hides whether the LED is wired to ground or to the supply;
//! a [`PwmChannel`] dims one with software PWM.

pub mod pwm;

pub use pwm::PwmChannel;

use prism_hal::OutputPin;

/// How the LED is wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Cathode to ground, lit when the pin is high
    #[default]
    CommonCathode,
    /// Anode to supply, lit when the pin is low
    CommonAnode,
}

/// Single LED on an output pin
pub struct Led<O> {
    pin: O,
    polarity: Polarity,
}

impl<O: OutputPin> Led<O> {
    /// Take `pin` and switch the LED off
    pub fn new(pin: O, polarity: Polarity) -> Self {
        let mut led = Self { pin, polarity };
        led.off();
        led
    }

    /// Light the LED
    pub fn on(&mut self) {
        self.set(true);
    }

    /// Extinguish the LED
    pub fn off(&mut self) {
        self.set(false);
    }

    /// Light or extinguish the LED
    pub fn set(&mut self, lit: bool) {
        let high = match self.polarity {
            Polarity::CommonCathode => lit,
            Polarity::CommonAnode => !lit,
        };
        self.pin.set_state(high);
    }

    /// Invert the LED
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }

    /// True if the LED is lit
    pub fn is_on(&mut self) -> bool {
        self.pin.is_set_high() == (self.polarity == Polarity::CommonCathode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pin(bool);

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&mut self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_common_cathode() {
        let mut led = Led::new(Pin(true), Polarity::CommonCathode);
        assert!(!led.is_on());
        led.on();
        assert!(led.pin.0);
        assert!(led.is_on());
    }

    #[test]
    fn test_common_anode_inverts() {
        let mut led = Led::new(Pin(false), Polarity::CommonAnode);
        assert!(led.pin.0);
        assert!(!led.is_on());
        led.on();
        assert!(!led.pin.0);
        led.toggle();
        assert!(!led.is_on());
    }
}
