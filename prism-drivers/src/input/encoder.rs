//! Quadrature rotary encoder driver
//!
//! Channels A and B form a two-bit Gray code `(A << 1) | B`. The previous and
//! current code together select a direction; every valid step publishes one
//! event, so a detent of a full-step encoder produces four.

use prism_core::interrupts::PinBinding;
use prism_core::observer::{EventBus, EventObserver, PinObserver};
use prism_core::sync::Shared;
use prism_core::{Error, Event, EventKind, HardwareId};
use prism_hal::InputPin;

/// Direction of the step from `last` to `code`, `None` for an invalid jump
fn step_direction(last: u8, code: u8) -> Option<EventKind> {
    match (last << 2) | code {
        0b1101 | 0b0100 | 0b0010 | 0b1011 => Some(EventKind::RotatedCw),
        0b1110 | 0b0111 | 0b0001 | 0b1000 => Some(EventKind::RotatedCcw),
        _ => None,
    }
}

struct EncoderState<A, B> {
    a: A,
    b: B,
    last: u8,
}

impl<A: InputPin, B: InputPin> EncoderState<A, B> {
    fn read(&mut self) -> u8 {
        (u8::from(self.a.is_high()) << 1) | u8::from(self.b.is_high())
    }

    fn step(&mut self) -> Option<EventKind> {
        let code = self.read();
        if code == self.last {
            return None;
        }
        let direction = step_direction(self.last, code);
        self.last = code;
        direction
    }
}

/// Rotary encoder publishing `RotatedCw`/`RotatedCcw`
pub struct RotaryEncoder<'a, A, B> {
    hardware: HardwareId,
    state: Shared<EncoderState<A, B>>,
    bus: EventBus<'a>,
    bindings: [Option<PinBinding<'a>>; 2],
}

impl<'a, A, B> RotaryEncoder<'a, A, B>
where
    A: InputPin + Send,
    B: InputPin + Send,
{
    /// Create an encoder on channels `a` and `b`, each with its pin-change
    /// binding if interrupt driven
    pub fn new(
        hardware: HardwareId,
        (a, a_binding): (A, Option<PinBinding<'a>>),
        (b, b_binding): (B, Option<PinBinding<'a>>),
    ) -> Self {
        let mut state = EncoderState { a, b, last: 0 };
        state.last = state.read();
        Self {
            hardware,
            state: Shared::new(state),
            bus: EventBus::new(),
            bindings: [a_binding, b_binding],
        }
    }

    /// Publish to `observer` and start observing both channel interrupts
    ///
    /// # Errors
    /// The binding's error if a channel cannot be observed. Nothing stays
    /// attached in that case.
    pub fn attach(&'a self, observer: &'a dyn EventObserver) -> Result<(), Error> {
        self.state.lock(|state| state.last = state.read());
        self.bus.attach(observer);
        for (attached, binding) in self.bindings.iter().flatten().enumerate() {
            if let Err(err) = binding.attach(self) {
                for bound in self.bindings.iter().flatten().take(attached) {
                    bound.detach();
                }
                self.bus.detach();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Stop publishing and release both channel interrupts
    pub fn detach(&self) {
        self.bus.detach();
        for binding in self.bindings.iter().flatten() {
            binding.detach();
        }
    }

    /// Re-read both channels, publishing a step if one occurred
    pub fn check(&self) {
        if let Some(kind) = self.state.lock(EncoderState::step) {
            self.bus.notify(&Event::new(self.hardware, kind, 0));
        }
    }
}

impl<'a, A, B> PinObserver for RotaryEncoder<'a, A, B>
where
    A: InputPin + Send,
    B: InputPin + Send,
{
    fn on_pin_change(&self) {
        self.check();
    }
}
