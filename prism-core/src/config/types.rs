//! Controller configuration type definitions

use prism_hal::serial::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest node address; addresses fit in the low nibble of the data byte
pub const MAX_NODE_ADDRESS: u8 = 15;

/// Highest supported software PWM frame rate
pub const MAX_PWM_FREQUENCY_HZ: u16 = 250;

/// Steps per software PWM frame
pub const PWM_STEPS: u32 = 256;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Node address above [`MAX_NODE_ADDRESS`]
    InvalidNodeAddress,
    /// A timeout is zero, or the idle timeout is not longer than the button timeout
    InvalidTimeout,
    /// PWM frequency zero or above [`MAX_PWM_FREQUENCY_HZ`]
    InvalidPwmFrequency,
    /// Baud rate zero
    InvalidBaudrate,
    /// Pin number out of range or used twice
    InvalidPin,
}

/// How the three front buttons map onto the node's channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorModel {
    /// Red, green, blue
    #[default]
    Rgb,
    /// Hue, saturation, intensity
    Hsl,
}

/// User interface timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Hold time after which a pressed button counts as held (ms)
    pub button_timeout_ms: u32,
    /// Inactivity before the feedback display is switched off (ms)
    pub idle_timeout_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            button_timeout_ms: 2_000,
            idle_timeout_ms: 40_000,
        }
    }
}

/// Software PWM settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmConfig {
    /// Full PWM frames per second
    pub frequency_hz: u16,
}

impl PwmConfig {
    /// Interval between ticks in microseconds
    pub fn tick_period_us(&self) -> u32 {
        1_000_000 / (u32::from(self.frequency_hz.max(1)) * PWM_STEPS)
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self { frequency_hz: 60 }
    }
}

/// Node link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// UART line settings
    pub uart: UartConfig,
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Address of the node this controller drives, 0 broadcasts
    pub node_address: u8,
    /// Button to channel mapping
    pub color_model: ColorModel,
    /// UI timeouts
    pub timing: TimingConfig,
    /// Feedback LED PWM
    pub pwm: PwmConfig,
    /// Node link
    pub link: LinkConfig,
}

impl ControllerConfig {
    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_address > MAX_NODE_ADDRESS {
            return Err(ConfigError::InvalidNodeAddress);
        }
        if self.timing.button_timeout_ms == 0
            || self.timing.idle_timeout_ms <= self.timing.button_timeout_ms
        {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.pwm.frequency_hz == 0 || self.pwm.frequency_hz > MAX_PWM_FREQUENCY_HZ {
            return Err(ConfigError::InvalidPwmFrequency);
        }
        if self.link.uart.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ControllerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.timing.button_timeout_ms, 2_000);
        assert_eq!(config.timing.idle_timeout_ms, 40_000);
        assert_eq!(config.color_model, ColorModel::Rgb);
    }

    #[test]
    fn test_invalid_fields() {
        let mut config = ControllerConfig {
            node_address: 16,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidNodeAddress));

        config.node_address = 3;
        config.timing.idle_timeout_ms = 1_000;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));

        config.timing = TimingConfig::default();
        config.pwm.frequency_hz = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPwmFrequency));

        config.pwm.frequency_hz = 60;
        config.link.uart.baudrate = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBaudrate));
    }

    #[test]
    fn test_tick_period() {
        assert_eq!(PwmConfig { frequency_hz: 60 }.tick_period_us(), 65);
        assert_eq!(PwmConfig { frequency_hz: 250 }.tick_period_us(), 15);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = ControllerConfig {
            node_address: 5,
            color_model: ColorModel::Hsl,
            link: LinkConfig {
                uart: UartConfig {
                    baudrate: 115_200,
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        let mut buf = [0u8; 64];
        let bytes = postcard::to_slice(&config, &mut buf).unwrap();
        let decoded: ControllerConfig = postcard::from_bytes(bytes).unwrap();
        assert_eq!(decoded, config);
    }
}
