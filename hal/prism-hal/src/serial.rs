//! Serial byte pipe abstractions
//!
//! The protocol layer only ever moves single bytes: the receive side is drained
//! from a buffer filled by the UART interrupt, the transmit side hands bytes to
//! whatever buffering the board provides.

/// Receive status flags reported alongside a received byte
///
/// Bit positions match the AVR-style UART status register the protocol was
/// first deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxFlags(u8);

impl RxFlags {
    /// No error
    pub const NONE: Self = Self(0);
    /// Stop bit was not detected
    pub const FRAME_ERROR: Self = Self(0x08);
    /// Hardware receive register overrun
    pub const OVERRUN: Self = Self(0x04);
    /// Software receive buffer was full and a byte was lost
    pub const BUFFER_OVERFLOW: Self = Self(0x02);

    /// Build from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::FRAME_ERROR.0 | Self::OVERRUN.0 | Self::BUFFER_OVERFLOW.0))
    }

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if no error bit is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of both flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Source of received bytes
pub trait ByteSource {
    /// Take the oldest received byte with the status recorded for it
    ///
    /// Returns `None` when nothing is buffered.
    fn get_byte(&mut self) -> Option<(RxFlags, u8)>;

    /// True if no received byte is waiting
    fn is_empty(&self) -> bool;
}

/// Sink for bytes to transmit
pub trait ByteSink {
    /// Queue one byte for transmission
    fn put_byte(&mut self, byte: u8);
}

/// Full-duplex serial port
pub trait SerialPort: ByteSource + ByteSink {}

// Blanket implementation
impl<T: ByteSource + ByteSink> SerialPort for T {}

/// UART line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    One,
    Two,
}
