//! Hardware interrupt multiplexers
//!
//! One multiplexer per interrupt vector. The vector handler calls the
//! multiplexer, the multiplexer fans the interrupt out to whichever drivers
//! attached to it, and switches the vector on or off as drivers come and go.

pub mod channel;
pub mod pin_change;
pub mod ports;
pub mod tick;

pub use channel::{SpiSubject, TwiSubject};
pub use pin_change::{PinChangeMux, PinSubject, PINS_PER_PORT};
pub use ports::{port_of, PinBinding, Port, PortBit, PortMuxes};
pub use tick::{ObserverId, TickMux, TickSubject, TICK_SLOTS};
