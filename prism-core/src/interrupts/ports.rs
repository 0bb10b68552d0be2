//! Pin to pin-change port lookup
//!
//! Each physical pin belongs to exactly one port and occupies one bit of that
//! port's pin-change vector. Drivers ask [`PortMuxes`] for the multiplexer
//! serving their pin instead of knowing the port layout.

use prism_hal::PinId;

use super::pin_change::{PinSubject, PINS_PER_PORT};
use crate::error::Error;
use crate::observer::PinObserver;

/// Number of pins with pin-change support
pub const PIN_COUNT: usize = 30;

/// Number of pin-change ports
pub const PORT_COUNT: usize = 4;

/// Pin-change port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
}

impl Port {
    /// Index into a per-port array
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Location of a pin within the pin-change ports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortBit {
    pub port: Port,
    pub bit: u8,
}

const PIN_TABLE: [PortBit; PIN_COUNT] = build_table();

const fn build_table() -> [PortBit; PIN_COUNT] {
    const PORTS: [Port; PORT_COUNT] = [Port::A, Port::B, Port::C, Port::D];
    let mut table = [PortBit {
        port: Port::A,
        bit: 0,
    }; PIN_COUNT];
    let mut pin = 0;
    while pin < PIN_COUNT {
        table[pin] = PortBit {
            port: PORTS[pin / PINS_PER_PORT],
            bit: (pin % PINS_PER_PORT) as u8,
        };
        pin += 1;
    }
    table
}

/// Port and bit for `pin`, `None` if the pin has no pin-change support
pub const fn port_of(pin: PinId) -> Option<PortBit> {
    let index = pin.number() as usize;
    if index < PIN_COUNT {
        Some(PIN_TABLE[index])
    } else {
        None
    }
}

/// A pin resolved to its multiplexer
#[derive(Clone, Copy)]
pub struct PinBinding<'a> {
    subject: &'a dyn PinSubject<'a>,
    bit: u8,
}

impl<'a> PinBinding<'a> {
    /// Bind directly to a multiplexer bit
    pub fn new(subject: &'a dyn PinSubject<'a>, bit: u8) -> Self {
        Self { subject, bit }
    }

    /// Bit within the port
    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// Register `observer` for this pin
    pub fn attach(&self, observer: &'a dyn PinObserver) -> Result<(), Error> {
        self.subject.attach(observer, self.bit)
    }

    /// Unregister whatever observes this pin
    pub fn detach(&self) {
        self.subject.detach(self.bit);
    }
}

/// The board's pin-change multiplexers, by port
pub struct PortMuxes<'a> {
    ports: [Option<&'a dyn PinSubject<'a>>; PORT_COUNT],
}

impl<'a> Default for PortMuxes<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PortMuxes<'a> {
    /// No port wired
    pub const fn new() -> Self {
        Self {
            ports: [None; PORT_COUNT],
        }
    }

    /// Wire the multiplexer serving `port`
    pub fn with_port(mut self, port: Port, subject: &'a dyn PinSubject<'a>) -> Self {
        self.ports[port.index()] = Some(subject);
        self
    }

    /// Multiplexer and bit serving `pin`
    pub fn binding(&self, pin: PinId) -> Option<PinBinding<'a>> {
        let location = port_of(pin)?;
        let subject = self.ports[location.port.index()]?;
        Some(PinBinding::new(subject, location.bit))
    }
}
