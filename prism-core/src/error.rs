//! Core error type

use core::fmt;

/// Errors reported by the event core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Event queue is at capacity, the event was not stored
    QueueFull,
    /// Every observer slot is taken
    ObserverTableFull,
    /// Slot index beyond the table
    SlotOutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::QueueFull => f.write_str("event queue full"),
            Error::ObserverTableFull => f.write_str("observer table full"),
            Error::SlotOutOfRange => f.write_str("observer slot out of range"),
        }
    }
}
