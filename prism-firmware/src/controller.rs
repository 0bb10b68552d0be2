//! Controller side effects on the RP2040 board
//!
//! Commands go out over the serial link, timeouts are served by the timer
//! task and node feedback is shown on the PWM LEDs.

use defmt::*;
use embassy_rp::gpio::Output;

use prism_core::controller::ControllerIo;
use prism_core::{Event, EventKind};
use prism_drivers::{EhOutput, PwmChannel};

use crate::channels::{TimerCommand, TIMER_COMMANDS};
use crate::system::Link;

/// Feedback LED channel
pub type Feedback = PwmChannel<'static, EhOutput<Output<'static>>>;

/// Board implementation of [`ControllerIo`]
pub struct FirmwareIo {
    link: &'static Link,
    feedback: &'static [Feedback; 3],
    last_timer: u8,
}

impl FirmwareIo {
    pub fn new(link: &'static Link, feedback: &'static [Feedback; 3]) -> Self {
        Self {
            link,
            feedback,
            last_timer: 0,
        }
    }

    fn command(&self, command: TimerCommand) {
        if TIMER_COMMANDS.try_send(command).is_err() {
            warn!("Timer command queue full, dropping {:?}", command);
        }
    }
}

/// LED showing a node report
fn feedback_channel(kind: EventKind) -> Option<usize> {
    match kind {
        EventKind::LedRedPwm | EventKind::LedHuePwm => Some(0),
        EventKind::LedGreenPwm | EventKind::LedSaturationPwm => Some(1),
        EventKind::LedBluePwm | EventKind::LedIntensityPwm => Some(2),
        _ => None,
    }
}

impl ControllerIo for FirmwareIo {
    fn send(&mut self, event: Event) {
        debug!("To node: {:?}", event);
        self.link.send(&event);
    }

    fn start_timer(&mut self, duration_ms: u32) -> u8 {
        self.last_timer = self.last_timer.wrapping_add(1);
        let id = self.last_timer;
        self.command(TimerCommand::Start { id, duration_ms });
        id
    }

    fn stop_timer(&mut self, id: u8) {
        self.command(TimerCommand::Stop { id });
    }

    fn show_feedback(&mut self, kind: EventKind, level: u8) {
        let Some(channel) = feedback_channel(kind) else {
            return;
        };
        if let Err(e) = self.feedback[channel].set_value(level) {
            warn!("Feedback LED {} unavailable: {:?}", channel, e);
        }
    }

    fn display_off(&mut self) {
        trace!("Feedback display off");
        for led in self.feedback {
            led.off();
        }
    }
}
