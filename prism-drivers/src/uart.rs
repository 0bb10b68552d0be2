//! Interrupt-driven UART receive buffer
//!
//! The receive interrupt hands each byte to [`UartReceiver::receive`], which
//! stores it and tells the observer that data arrived. The main side drains the
//! buffer through a [`UartReader`], the [`ByteSource`] the serial link decodes
//! from.

use heapless::Deque;
use prism_core::observer::{EventBus, EventObserver};
use prism_core::sync::Shared;
use prism_core::{Event, EventKind, HardwareId};
use prism_hal::{ByteSource, RxFlags};
use prism_protocol::FLAG;

/// Default receive buffer size
pub const RX_BUFFER_SIZE: usize = 64;

struct RxBuffer<const N: usize> {
    bytes: Deque<(RxFlags, u8), N>,
    /// A byte was dropped since the last stored one
    overflowed: bool,
}

/// Receive side of a UART
pub struct UartReceiver<'a, const N: usize = RX_BUFFER_SIZE> {
    hardware: HardwareId,
    buffer: Shared<RxBuffer<N>>,
    bus: EventBus<'a>,
}

impl<'a, const N: usize> UartReceiver<'a, N> {
    /// Create an empty receiver publishing as `hardware`
    pub const fn new(hardware: HardwareId) -> Self {
        Self {
            hardware,
            buffer: Shared::new(RxBuffer {
                bytes: Deque::new(),
                overflowed: false,
            }),
            bus: EventBus::new(),
        }
    }

    /// Publish receive activity to `observer`
    pub fn attach(&self, observer: &'a dyn EventObserver) {
        self.bus.attach(observer);
    }

    /// Stop publishing
    pub fn detach(&self) {
        self.bus.detach();
    }

    /// Receive interrupt handler
    ///
    /// `flags` are the line errors reported with `byte`. When the buffer is
    /// full the byte is dropped and the next stored byte carries
    /// [`RxFlags::BUFFER_OVERFLOW`]. Returns false if the byte was dropped.
    pub fn receive(&self, byte: u8, flags: RxFlags) -> bool {
        let stored = self.buffer.lock(|buffer| {
            let flags = if buffer.overflowed {
                flags.union(RxFlags::BUFFER_OVERFLOW)
            } else {
                flags
            };
            let stored = buffer.bytes.push_back((flags, byte)).is_ok();
            buffer.overflowed = !stored;
            stored
        });

        if byte == FLAG {
            self.bus
                .notify(&Event::new(self.hardware, EventKind::UartFlagFound, byte));
        }
        self.bus
            .notify(&Event::new(self.hardware, EventKind::UartRx, byte));
        stored
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.buffer.lock(|buffer| buffer.bytes.len())
    }

    /// True if no byte is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Main-side handle draining the buffer
    pub const fn reader(&self) -> UartReader<'_, 'a, N> {
        UartReader { receiver: self }
    }
}

/// [`ByteSource`] over a [`UartReceiver`]
pub struct UartReader<'r, 'a, const N: usize = RX_BUFFER_SIZE> {
    receiver: &'r UartReceiver<'a, N>,
}

impl<const N: usize> ByteSource for UartReader<'_, '_, N> {
    fn get_byte(&mut self) -> Option<(RxFlags, u8)> {
        self.receiver
            .buffer
            .lock(|buffer| buffer.bytes.pop_front())
    }

    fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
