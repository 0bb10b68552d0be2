//! Subject/observer dispatch
//!
//! Observers are single-method traits held by shared reference. Subjects come
//! in two shapes:
//!
//! - [`Subject`]: at most one observer, attach replaces
//! - [`SlotTable`]: fixed array of observers, used by the interrupt
//!   multiplexers to fan one vector out to several drivers
//!
//! All observer traits require `Sync` since notifications run in interrupt
//! context while attachment happens from the main loop.

pub mod slots;
pub mod subject;

pub use slots::SlotTable;
pub use subject::{EventBus, Subject};

use prism_protocol::Event;

/// Receiver of events
pub trait EventObserver: Sync {
    /// Called with each event published by the subject
    fn update(&self, event: &Event);
}

/// Receiver of pin-change interrupts
pub trait PinObserver: Sync {
    /// A pin on the observed port changed level
    fn on_pin_change(&self);
}

/// Receiver of periodic ticks
pub trait TickObserver: Sync {
    /// Called on every tick with the wrapping tick count
    fn on_tick(&self, tick: u8);
}

/// Receiver of SPI transfer completion
pub trait SpiObserver: Sync {
    /// Called with the byte shifted in
    fn on_byte(&self, byte: u8);
}

/// Receiver of TWI completion
pub trait TwiObserver: Sync {
    /// The bus finished the current step
    fn on_complete(&self);
}
