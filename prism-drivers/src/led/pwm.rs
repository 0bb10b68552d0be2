//! Software PWM channel
//!
//! Each tick the channel compares its duty value with the tick counter: the
//! LED is lit while `value > tick`. Fully off (0) and fully on (255) need no
//! ticks, so the channel detaches from the tick source and drives the pin
//! steadily, letting the tick timer stop when nothing dims.

use prism_core::interrupts::{ObserverId, TickSubject};
use prism_core::observer::TickObserver;
use prism_core::sync::Shared;
use prism_core::Error;
use prism_hal::OutputPin;

use super::{Led, Polarity};

/// Duty value for fully off
pub const PWM_OFF: u8 = 0x00;

/// Duty value for fully on
pub const PWM_ON: u8 = 0xFF;

struct PwmState<O> {
    led: Led<O>,
    value: u8,
    id: Option<ObserverId>,
}

/// Dimmable LED driven from the tick multiplexer
pub struct PwmChannel<'a, O> {
    state: Shared<PwmState<O>>,
    ticks: &'a dyn TickSubject<'a>,
}

impl<'a, O: OutputPin + Send> PwmChannel<'a, O> {
    /// Create a channel, initially off
    pub fn new(pin: O, polarity: Polarity, ticks: &'a dyn TickSubject<'a>) -> Self {
        Self {
            state: Shared::new(PwmState {
                led: Led::new(pin, polarity),
                value: PWM_OFF,
                id: None,
            }),
            ticks,
        }
    }

    /// Set the duty value
    ///
    /// # Errors
    /// [`Error::ObserverTableFull`] if the channel needs ticks and no tick slot
    /// is free. The channel keeps its previous value.
    pub fn set_value(&'a self, value: u8) -> Result<(), Error> {
        match value {
            PWM_OFF => self.off(),
            PWM_ON => self.on(),
            _ => {
                if !self.is_dimming() {
                    let id = self.ticks.attach(self)?;
                    self.state.lock(|state| state.id = Some(id));
                }
                self.state.lock(|state| state.value = value);
            }
        }
        Ok(())
    }

    /// Set the duty cycle in percent, clamped to 100
    pub fn set_percent(&'a self, percent: u8) -> Result<(), Error> {
        let percent = u16::from(percent.min(100));
        // At most 255 after the clamp
        self.set_value((percent * 255 / 100) as u8)
    }

    /// Fully on
    pub fn on(&self) {
        self.steady(PWM_ON, true);
    }

    /// Fully off
    pub fn off(&self) {
        self.steady(PWM_OFF, false);
    }

    /// Invert a steady LED, or shift a dimmed one by half the range
    pub fn toggle(&'a self) -> Result<(), Error> {
        let value = self.value();
        if value == PWM_OFF || value == PWM_ON {
            self.state.lock(|state| state.led.toggle());
            Ok(())
        } else {
            self.set_value(value.wrapping_add(128))
        }
    }

    /// Current duty value
    pub fn value(&self) -> u8 {
        self.state.lock(|state| state.value)
    }

    /// True while receiving ticks
    pub fn is_dimming(&self) -> bool {
        self.state.lock(|state| state.id.is_some())
    }

    fn steady(&self, value: u8, lit: bool) {
        let id = self.state.lock(|state| {
            state.value = value;
            state.id.take()
        });
        if let Some(id) = id {
            self.ticks.detach(id);
        }
        self.state.lock(|state| state.led.set(lit));
    }
}

impl<'a, O: OutputPin + Send> TickObserver for PwmChannel<'a, O> {
    fn on_tick(&self, tick: u8) {
        self.state.lock(|state| {
            if state.id.is_some() {
                let lit = state.value > tick;
                state.led.set(lit);
            }
        });
    }
}
