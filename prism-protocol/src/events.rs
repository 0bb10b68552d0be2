//! Event model shared by every producer and consumer
//!
//! An [`Event`] is three bytes: which piece of hardware produced it, what
//! happened, and one byte of data. The same three bytes are what travels
//! inside a protocol frame, so both enums have a fixed wire value.

use crate::frame::Payload;

/// Declares a `#[repr(u8)]` enum with its wire conversions
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every variant in wire order
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// Parse from the wire byte
            pub const fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $( $value => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Wire byte
            pub const fn to_byte(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(byte: u8) -> Result<Self, Self::Error> {
                Self::from_byte(byte).ok_or(byte)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.to_byte()
            }
        }
    };
}

wire_enum! {
    /// Source of an event
    pub enum HardwareId {
        Button01 = 0x00,
        Button02 = 0x01,
        Button03 = 0x02,
        Button04 = 0x03,
        Timer01 = 0x04,
        Uart00 = 0x05,
        RotaryEncoder01 = 0x06,
        /// Synthesized enter/exit events
        StateMachine = 0x07,
        RgbController = 0x08,
        RgbNode = 0x09,
        Spi01 = 0x0A,
        Twi01 = 0x0B,
        Eeprom01 = 0x0C,
        /// Sentinel, marks a cleared event
        Invalid = 0x0D,
    }
}

wire_enum! {
    /// What happened
    ///
    /// Values are grouped by producer: local hardware below 0x10, controller
    /// commands from 0xA0, node feedback from 0xC0, bus peripherals from 0xD0.
    pub enum EventKind {
        ButtonReleased = 0x00,
        ButtonPressed = 0x01,
        TimerStart = 0x02,
        TimerStop = 0x03,
        TimerExpire = 0x04,
        UartTxComplete = 0x05,
        UartRx = 0x06,
        /// A FLAG byte arrived on the UART
        UartFlagFound = 0x07,
        RotatedCw = 0x08,
        RotatedCcw = 0x09,
        EnterState = 0x0A,
        ExitState = 0x0B,

        SetRed = 0xA0,
        SetGreen = 0xA1,
        SetBlue = 0xA2,
        SetHue = 0xA3,
        SetSaturation = 0xA4,
        SetIntensity = 0xA5,
        ReCw = 0xA6,
        ReCcw = 0xA7,
        RePressed = 0xA8,
        ReReleased = 0xA9,
        OnlyRed = 0xAA,
        OnlyGreen = 0xAB,
        OnlyBlue = 0xAC,
        AllOff = 0xAD,
        AllHalf = 0xAE,
        AllOn = 0xAF,
        Select = 0xB0,
        ForceFeedback = 0xB1,

        LedRedPwm = 0xC0,
        LedGreenPwm = 0xC1,
        LedBluePwm = 0xC2,
        LedHuePwm = 0xC3,
        LedSaturationPwm = 0xC4,
        LedIntensityPwm = 0xC5,

        SpiByteComplete = 0xD0,
        SpiMsgComplete = 0xD1,
        TwiWriteComplete = 0xD2,
        TwiReadComplete = 0xD3,
        TwiError = 0xD4,
        EepromReadRequest = 0xD5,
        EepromReadComplete = 0xD6,
        EepromWriteRequest = 0xD7,
        EepromWriteComplete = 0xD8,
        EepromStatusRequest = 0xD9,
        EepromStatusComplete = 0xDA,

        /// Sentinel, marks a cleared event
        Invalid = 0xDB,
    }
}

impl EventKind {
    /// Returns true for level reports sent back by the node
    pub fn is_node_feedback(&self) -> bool {
        (EventKind::LedRedPwm.to_byte()..=EventKind::LedIntensityPwm.to_byte())
            .contains(&self.to_byte())
    }
}

/// One unit of work for the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    /// Producer
    pub hardware: HardwareId,
    /// What happened
    pub kind: EventKind,
    /// Producer-specific payload byte
    pub data: u8,
}

impl Default for Event {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Event {
    /// Cleared event, both identifiers set to their sentinel
    pub const INVALID: Self = Self::new(HardwareId::Invalid, EventKind::Invalid, 0);

    /// Create a new event
    pub const fn new(hardware: HardwareId, kind: EventKind, data: u8) -> Self {
        Self {
            hardware,
            kind,
            data,
        }
    }

    /// Event delivered to a state when it becomes current
    pub const fn enter_state() -> Self {
        Self::new(HardwareId::StateMachine, EventKind::EnterState, 0)
    }

    /// Event delivered to a state when it stops being current
    pub const fn exit_state() -> Self {
        Self::new(HardwareId::StateMachine, EventKind::ExitState, 0)
    }

    /// Frame payload in wire order
    pub const fn to_payload(&self) -> Payload {
        [self.hardware.to_byte(), self.kind.to_byte(), self.data]
    }

    /// Parse a frame payload, rejecting unknown identifiers
    pub const fn from_payload(payload: &Payload) -> Option<Self> {
        let Some(hardware) = HardwareId::from_byte(payload[0]) else {
            return None;
        };
        let Some(kind) = EventKind::from_byte(payload[1]) else {
            return None;
        };
        Some(Self::new(hardware, kind, payload[2]))
    }
}
