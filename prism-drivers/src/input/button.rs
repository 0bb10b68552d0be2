//! Push button driver

use prism_core::interrupts::PinBinding;
use prism_core::observer::{EventBus, EventObserver, PinObserver};
use prism_core::sync::Shared;
use prism_core::{Error, Event, EventKind, HardwareId};
use prism_hal::InputPin;

struct ButtonState<P> {
    pin: P,
    active_low: bool,
    pressed: bool,
}

impl<P: InputPin> ButtonState<P> {
    fn read(&mut self) -> bool {
        self.pin.is_high() != self.active_low
    }

    /// New level if it changed since the last read
    fn refresh(&mut self) -> Option<bool> {
        let pressed = self.read();
        if pressed == self.pressed {
            return None;
        }
        self.pressed = pressed;
        Some(pressed)
    }
}

/// Push button publishing `ButtonPressed`/`ButtonReleased`
///
/// Without a pin binding the button is polled with [`Button::check`].
pub struct Button<'a, P> {
    hardware: HardwareId,
    state: Shared<ButtonState<P>>,
    bus: EventBus<'a>,
    binding: Option<PinBinding<'a>>,
}

impl<'a, P: InputPin + Send> Button<'a, P> {
    /// Create a button reading `pin`
    ///
    /// The current level is taken as the initial state, no event is
    /// published for it.
    pub fn new(
        hardware: HardwareId,
        pin: P,
        active_low: bool,
        binding: Option<PinBinding<'a>>,
    ) -> Self {
        let mut state = ButtonState {
            pin,
            active_low,
            pressed: false,
        };
        state.pressed = state.read();
        Self {
            hardware,
            state: Shared::new(state),
            bus: EventBus::new(),
            binding,
        }
    }

    /// Publish to `observer` and start observing the pin interrupt
    ///
    /// # Errors
    /// The binding's error if the pin cannot be observed, leaving the button
    /// detached.
    pub fn attach(&'a self, observer: &'a dyn EventObserver) -> Result<(), Error> {
        self.state.lock(|state| {
            state.refresh();
        });
        self.bus.attach(observer);
        if let Some(binding) = self.binding {
            binding.attach(self).inspect_err(|_| self.bus.detach())?;
        }
        Ok(())
    }

    /// Stop publishing and release the pin interrupt
    pub fn detach(&self) {
        self.bus.detach();
        if let Some(binding) = self.binding {
            binding.detach();
        }
    }

    /// Re-read the pin, publishing an event if the level changed
    pub fn check(&self) {
        let changed = self.state.lock(ButtonState::refresh);
        if let Some(pressed) = changed {
            let kind = if pressed {
                EventKind::ButtonPressed
            } else {
                EventKind::ButtonReleased
            };
            self.bus.notify(&Event::new(self.hardware, kind, 0));
        }
    }

    /// Level seen by the last read
    pub fn is_pressed(&self) -> bool {
        self.state.lock(|state| state.pressed)
    }

    /// Source identifier of published events
    pub fn hardware(&self) -> HardwareId {
        self.hardware
    }
}

impl<'a, P: InputPin + Send> PinObserver for Button<'a, P> {
    fn on_pin_change(&self) {
        self.check();
    }
}
