//! Pin-change interrupt multiplexer
//!
//! A port has one pin-change vector shared by its eight pins. Each attached
//! observer owns one bit; the vector is enabled while at least one bit is
//! attached.

use prism_hal::PinChangeSource;

use crate::error::Error;
use crate::observer::{PinObserver, SlotTable};
use crate::sync::Shared;

/// Pins per port
pub const PINS_PER_PORT: usize = 8;

/// Something pin observers can register with
pub trait PinSubject<'a>: Sync {
    /// Observe changes on `bit`, replacing any observer already there
    fn attach(&self, observer: &'a dyn PinObserver, bit: u8) -> Result<(), Error>;

    /// Stop observing `bit`
    fn detach(&self, bit: u8);
}

struct PortState<'a, C> {
    slots: SlotTable<'a, dyn PinObserver + 'a, PINS_PER_PORT>,
    control: C,
}

/// Fan-out for one port's pin-change vector
pub struct PinChangeMux<'a, C> {
    state: Shared<PortState<'a, C>>,
}

impl<'a, C: PinChangeSource> PinChangeMux<'a, C> {
    /// Create a multiplexer with every bit free and the vector untouched
    pub const fn new(control: C) -> Self {
        Self {
            state: Shared::new(PortState {
                slots: SlotTable::new(),
                control,
            }),
        }
    }

    /// Vector handler
    ///
    /// Every attached observer is called, in bit order, whichever pin changed.
    pub fn notify(&self) {
        let observers = self.state.lock(|state| state.slots.snapshot());
        for observer in observers.iter().flatten() {
            observer.on_pin_change();
        }
    }

    /// Number of attached observers
    pub fn observer_count(&self) -> usize {
        self.state.lock(|state| state.slots.count())
    }

    /// Inspect the interrupt control
    pub fn control<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        self.state.lock(|state| f(&state.control))
    }
}

impl<'a, C: PinChangeSource + Send> PinSubject<'a> for PinChangeMux<'a, C> {
    fn attach(&self, observer: &'a dyn PinObserver, bit: u8) -> Result<(), Error> {
        self.state.lock(|state| {
            let newly_occupied = state.slots.insert_at(usize::from(bit), observer)?;
            state.control.unmask(bit);
            if newly_occupied && state.slots.count() == 1 {
                state.control.enable();
            }
            Ok(())
        })
    }

    fn detach(&self, bit: u8) {
        self.state.lock(|state| {
            if state.slots.remove(usize::from(bit)) {
                state.control.mask(bit);
                if state.slots.count() == 0 {
                    state.control.disable();
                }
            }
        });
    }
}
