//! Controller board definition
//!
//! Pin numbers here must match the pins taken from the peripherals in
//! `main`.

use embassy_rp::gpio::Pull;
use embassy_rp::uart;

use prism_core::config::{BoardPins, ControllerConfig, PinConfig};
use prism_drivers::Polarity;
use prism_hal::serial::{DataBits, Parity, StopBits, UartConfig};

/// Pins with an edge task: three front buttons, encoder A, B and switch
pub const EDGE_PINS: usize = 6;

/// Node this controller drives
pub const NODE_ADDRESS: u8 = 1;

/// Feedback LED wiring
pub const FEEDBACK_POLARITY: Polarity = Polarity::CommonCathode;

/// Encoder channel, pulled up, direction only
const fn encoder_channel(pin: u8) -> PinConfig {
    PinConfig {
        pin,
        inverted: false,
        pull_up: true,
    }
}

/// Pin assignment
pub const PINS: BoardPins = BoardPins {
    buttons: [
        PinConfig::active_low(2),
        PinConfig::active_low(3),
        PinConfig::active_low(4),
    ],
    encoder_a: encoder_channel(5),
    encoder_b: encoder_channel(6),
    encoder_button: PinConfig::active_low(7),
    feedback: [PinConfig::new(16), PinConfig::new(17), PinConfig::new(18)],
};

/// Edge-task pins in the order their levels are stored
pub fn edge_pins(pins: &BoardPins) -> [PinConfig; EDGE_PINS] {
    [
        pins.buttons[0],
        pins.buttons[1],
        pins.buttons[2],
        pins.encoder_a,
        pins.encoder_b,
        pins.encoder_button,
    ]
}

pub fn pull(pin: PinConfig) -> Pull {
    if pin.pull_up {
        Pull::Up
    } else {
        Pull::None
    }
}

/// Controller configuration for this board
pub fn controller_config() -> ControllerConfig {
    ControllerConfig {
        node_address: NODE_ADDRESS,
        ..Default::default()
    }
}

/// Line settings for the RP2040 UART
pub fn uart_config(line: &UartConfig) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = line.baudrate;
    config.data_bits = match line.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    config.parity = match line.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    config.stop_bits = match line.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    config
}
