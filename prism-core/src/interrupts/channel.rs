//! Single-channel interrupt subjects
//!
//! The SPI and TWI vectors each serve one driver at a time, so they are plain
//! single-observer subjects.

use crate::observer::{SpiObserver, Subject, TwiObserver};

/// Subject for the SPI transfer-complete vector
pub type SpiSubject<'a> = Subject<'a, dyn SpiObserver + 'a>;

/// Subject for the TWI vector
pub type TwiSubject<'a> = Subject<'a, dyn TwiObserver + 'a>;

impl<'a> Subject<'a, dyn SpiObserver + 'a> {
    /// Vector handler, `byte` is the data register contents
    pub fn notify(&self, byte: u8) {
        if let Some(observer) = self.observer() {
            observer.on_byte(byte);
        }
    }
}

impl<'a> Subject<'a, dyn TwiObserver + 'a> {
    /// Vector handler
    pub fn notify(&self) {
        if let Some(observer) = self.observer() {
            observer.on_complete();
        }
    }
}
