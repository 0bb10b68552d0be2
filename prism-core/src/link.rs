//! Serial link to the RGB node
//!
//! Binds the frame codec to a byte pipe. Outgoing events are encoded straight
//! into the transmit sink. Incoming bytes are drained from the receive source
//! whenever the UART driver reports activity, and each completed frame is
//! published on the link's own [`EventBus`].

use prism_hal::{ByteSink, ByteSource, RxFlags};
use prism_protocol::frame::{self, DecoderStats, FrameDecoder};
use prism_protocol::{Event, EventKind};

use crate::observer::{EventBus, EventObserver};
use crate::sync::Shared;

struct Receiver<R> {
    source: R,
    decoder: FrameDecoder,
    line_errors: RxFlags,
}

/// Framed event link over a byte pipe
pub struct SerialLink<'a, R, T> {
    rx: Shared<Receiver<R>>,
    tx: Shared<T>,
    bus: EventBus<'a>,
}

impl<'a, R: ByteSource, T: ByteSink> SerialLink<'a, R, T> {
    /// Create a link reading from `source` and writing to `sink`
    pub const fn new(source: R, sink: T) -> Self {
        Self {
            rx: Shared::new(Receiver {
                source,
                decoder: FrameDecoder::new(),
                line_errors: RxFlags::NONE,
            }),
            tx: Shared::new(sink),
            bus: EventBus::new(),
        }
    }

    /// Encode `event` into the transmit sink
    pub fn send(&self, event: &Event) {
        self.tx.lock(|sink| frame::encode(event, |byte| sink.put_byte(byte)));
    }

    /// Drain the receive source and take the decoded event, if any
    ///
    /// When several frames complete during one drain only the last is
    /// returned.
    pub fn poll(&self) -> Option<Event> {
        self.rx.lock(|rx| {
            while let Some((flags, byte)) = rx.source.get_byte() {
                rx.line_errors = rx.line_errors.union(flags);
                rx.decoder.feed(byte);
            }
            rx.decoder.take()
        })
    }

    /// Publish decoded events to `observer`
    pub fn attach(&self, observer: &'a dyn EventObserver) {
        self.bus.attach(observer);
    }

    /// Stop publishing decoded events
    pub fn detach(&self) {
        self.bus.detach();
    }

    /// Receive errors seen since the last call
    pub fn take_line_errors(&self) -> RxFlags {
        self.rx
            .lock(|rx| core::mem::replace(&mut rx.line_errors, RxFlags::NONE))
    }

    /// Decoder counters
    pub fn stats(&self) -> DecoderStats {
        self.rx.lock(|rx| rx.decoder.stats())
    }
}

impl<'a, R, T> EventObserver for SerialLink<'a, R, T>
where
    R: ByteSource + Send,
    T: ByteSink + Send,
{
    /// Decode on UART activity and forward the result
    fn update(&self, event: &Event) {
        if matches!(event.kind, EventKind::UartRx | EventKind::UartFlagFound) {
            if let Some(decoded) = self.poll() {
                self.bus.notify(&decoded);
            }
        }
    }
}
