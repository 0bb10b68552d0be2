//! Controller state machine
//!
//! ```text
//!            press n                 press m
//!   Idle ───────────► Pressed(n) ───────────► Chord(n, m)
//!    ▲  ◄───────────      │       ◄───────────     │
//!    │  release n /       │       release one      │
//!    │  timeout           │                        │
//!    └────────────────────┴────────────────────────┘
//!                          timeout
//! ```
//!
//! Rotary encoder events are forwarded to the node in every state.

use prism_protocol::{Event, EventKind, HardwareId};

use crate::config::{ColorModel, ControllerConfig};
use crate::state::{StateHandler, Transition};

/// One of the three front buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrontButton {
    One,
    Two,
    Three,
}

impl FrontButton {
    /// Button producing events as `hardware`
    pub fn from_hardware(hardware: HardwareId) -> Option<Self> {
        match hardware {
            HardwareId::Button01 => Some(FrontButton::One),
            HardwareId::Button02 => Some(FrontButton::Two),
            HardwareId::Button03 => Some(FrontButton::Three),
            _ => None,
        }
    }

    /// Command for a short press
    fn select_kind(self, model: ColorModel) -> EventKind {
        match (model, self) {
            (ColorModel::Rgb, FrontButton::One) => EventKind::SetRed,
            (ColorModel::Rgb, FrontButton::Two) => EventKind::SetGreen,
            (ColorModel::Rgb, FrontButton::Three) => EventKind::SetBlue,
            (ColorModel::Hsl, FrontButton::One) => EventKind::SetHue,
            (ColorModel::Hsl, FrontButton::Two) => EventKind::SetSaturation,
            (ColorModel::Hsl, FrontButton::Three) => EventKind::SetIntensity,
        }
    }

    /// Command for a held button
    fn hold_kind(self) -> EventKind {
        match self {
            FrontButton::One => EventKind::OnlyRed,
            FrontButton::Two => EventKind::OnlyGreen,
            FrontButton::Three => EventKind::OnlyBlue,
        }
    }
}

/// Controller UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerState {
    /// Waiting for input
    Idle,
    /// One button held
    Pressed(FrontButton),
    /// Two buttons held, lower button first
    Chord(FrontButton, FrontButton),
}

impl ControllerState {
    fn chord(a: FrontButton, b: FrontButton) -> Self {
        ControllerState::Chord(a.min(b), a.max(b))
    }
}

/// Command for a held two-button chord
fn chord_kind(low: FrontButton, high: FrontButton) -> Option<EventKind> {
    match (low, high) {
        (FrontButton::One, FrontButton::Two) => Some(EventKind::AllOff),
        (FrontButton::One, FrontButton::Three) => Some(EventKind::AllHalf),
        (FrontButton::Two, FrontButton::Three) => Some(EventKind::AllOn),
        _ => None,
    }
}

/// Side effects of the controller
pub trait ControllerIo {
    /// Send an event to the node
    fn send(&mut self, event: Event);

    /// Start a one-shot timer; expiry arrives as a `Timer01`/`TimerExpire`
    /// event carrying the returned id
    fn start_timer(&mut self, duration_ms: u32) -> u8;

    /// Cancel a running timer
    fn stop_timer(&mut self, id: u8);

    /// Show a level reported by the node
    fn show_feedback(&mut self, kind: EventKind, level: u8);

    /// Blank the feedback display
    fn display_off(&mut self);
}

/// Controller UI behavior
pub struct RgbController<IO> {
    io: IO,
    config: ControllerConfig,
    timer: Option<u8>,
}

impl<IO: ControllerIo> RgbController<IO> {
    /// Create the controller; its state machine starts in
    /// [`ControllerState::Idle`]
    pub fn new(io: IO, config: ControllerConfig) -> Self {
        Self {
            io,
            config,
            timer: None,
        }
    }

    /// Side-effect sink
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Side-effect sink, mutably
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    fn send(&mut self, kind: EventKind) {
        let event = Event::new(HardwareId::RgbController, kind, self.config.node_address);
        self.io.send(event);
    }

    fn is_own_timeout(&self, event: &Event) -> bool {
        event.hardware == HardwareId::Timer01
            && event.kind == EventKind::TimerExpire
            && self.timer == Some(event.data)
    }

    fn forward_encoder(&mut self, kind: EventKind) {
        let forwarded = match kind {
            EventKind::RotatedCw => EventKind::ReCw,
            EventKind::RotatedCcw => EventKind::ReCcw,
            EventKind::ButtonPressed => EventKind::RePressed,
            EventKind::ButtonReleased => EventKind::ReReleased,
            _ => return,
        };
        self.send(forwarded);
    }
}

impl<IO: ControllerIo> StateHandler for RgbController<IO> {
    type State = ControllerState;

    fn handle(
        &mut self,
        state: ControllerState,
        event: &Event,
        transition: &mut Transition<ControllerState>,
    ) {
        match (event.hardware, event.kind) {
            (HardwareId::StateMachine, EventKind::EnterState) => {
                let timeout = match state {
                    ControllerState::Idle => self.config.timing.idle_timeout_ms,
                    _ => self.config.timing.button_timeout_ms,
                };
                self.timer = Some(self.io.start_timer(timeout));
                return;
            }
            (HardwareId::StateMachine, EventKind::ExitState) => {
                if let Some(id) = self.timer.take() {
                    self.io.stop_timer(id);
                }
                return;
            }
            (HardwareId::RotaryEncoder01, kind) => {
                self.forward_encoder(kind);
                return;
            }
            (HardwareId::RgbNode, kind) if kind.is_node_feedback() => {
                self.io.show_feedback(kind, event.data);
                if state == ControllerState::Idle {
                    // Re-enter to restart the idle timeout
                    transition.request(ControllerState::Idle);
                }
                return;
            }
            _ => {}
        }

        if self.is_own_timeout(event) {
            self.timer = None;
            match state {
                ControllerState::Idle => self.io.display_off(),
                ControllerState::Pressed(held) => {
                    self.send(held.hold_kind());
                    transition.request(ControllerState::Idle);
                }
                ControllerState::Chord(low, high) => {
                    if let Some(kind) = chord_kind(low, high) {
                        self.send(kind);
                    }
                    transition.request(ControllerState::Idle);
                }
            }
            return;
        }

        let Some(button) = FrontButton::from_hardware(event.hardware) else {
            return;
        };
        match (state, event.kind) {
            (ControllerState::Idle, EventKind::ButtonPressed) => {
                transition.request(ControllerState::Pressed(button));
            }
            (ControllerState::Pressed(held), EventKind::ButtonReleased) if held == button => {
                self.send(held.select_kind(self.config.color_model));
                transition.request(ControllerState::Idle);
            }
            (ControllerState::Pressed(held), EventKind::ButtonPressed) if held != button => {
                transition.request(ControllerState::chord(held, button));
            }
            (ControllerState::Chord(low, high), EventKind::ButtonReleased) => {
                if button == low {
                    transition.request(ControllerState::Pressed(high));
                } else if button == high {
                    transition.request(ControllerState::Pressed(low));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateMachine;
    use heapless::Vec;

    #[derive(Default)]
    struct FakeIo {
        sent: Vec<Event, 16>,
        started: Vec<(u8, u32), 16>,
        stopped: Vec<u8, 16>,
        feedback: Option<(EventKind, u8)>,
        display_off: bool,
        next_id: u8,
    }

    impl ControllerIo for FakeIo {
        fn send(&mut self, event: Event) {
            self.sent.push(event).unwrap();
        }

        fn start_timer(&mut self, duration_ms: u32) -> u8 {
            self.next_id += 1;
            self.started.push((self.next_id, duration_ms)).unwrap();
            self.next_id
        }

        fn stop_timer(&mut self, id: u8) {
            self.stopped.push(id).unwrap();
        }

        fn show_feedback(&mut self, kind: EventKind, level: u8) {
            self.feedback = Some((kind, level));
        }

        fn display_off(&mut self) {
            self.display_off = true;
        }
    }

    fn machine(model: ColorModel) -> StateMachine<RgbController<FakeIo>> {
        let config = ControllerConfig {
            node_address: 3,
            color_model: model,
            ..Default::default()
        };
        let mut machine =
            StateMachine::new(RgbController::new(FakeIo::default(), config), ControllerState::Idle);
        machine.start();
        machine
    }

    fn press(hardware: HardwareId) -> Event {
        Event::new(hardware, EventKind::ButtonPressed, 0)
    }

    fn release(hardware: HardwareId) -> Event {
        Event::new(hardware, EventKind::ButtonReleased, 0)
    }

    fn expire(machine: &StateMachine<RgbController<FakeIo>>) -> Event {
        let id = machine.handler().io().next_id;
        Event::new(HardwareId::Timer01, EventKind::TimerExpire, id)
    }

    fn sent_kinds(machine: &StateMachine<RgbController<FakeIo>>) -> Vec<EventKind, 16> {
        machine.handler().io().sent.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_start_arms_idle_timeout() {
        let machine = machine(ColorModel::Rgb);
        assert_eq!(&machine.handler().io().started[..], &[(1, 40_000)]);
    }

    #[test]
    fn test_short_press_selects_channel() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&press(HardwareId::Button02));
        assert_eq!(machine.state(), ControllerState::Pressed(FrontButton::Two));
        assert_eq!(machine.handler().io().started[1], (2, 2_000));
        assert_eq!(&machine.handler().io().stopped[..], &[1]);

        machine.process(&release(HardwareId::Button02));
        assert_eq!(machine.state(), ControllerState::Idle);
        let sent = &machine.handler().io().sent;
        assert_eq!(
            &sent[..],
            &[Event::new(HardwareId::RgbController, EventKind::SetGreen, 3)]
        );
    }

    #[test]
    fn test_short_press_hsl_model() {
        let mut machine = machine(ColorModel::Hsl);
        machine.process(&press(HardwareId::Button03));
        machine.process(&release(HardwareId::Button03));
        assert_eq!(&sent_kinds(&machine)[..], &[EventKind::SetIntensity]);
    }

    #[test]
    fn test_hold_sends_only_channel() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&press(HardwareId::Button01));
        let timeout = expire(&machine);
        machine.process(&timeout);
        assert_eq!(machine.state(), ControllerState::Idle);

        // Late release is ignored in idle
        machine.process(&release(HardwareId::Button01));
        assert_eq!(&sent_kinds(&machine)[..], &[EventKind::OnlyRed]);
    }

    #[test]
    fn test_stale_timer_ignored() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&press(HardwareId::Button01));
        // Idle timer id 1 was stopped on exit
        machine.process(&Event::new(HardwareId::Timer01, EventKind::TimerExpire, 1));
        assert_eq!(machine.state(), ControllerState::Pressed(FrontButton::One));
        assert!(sent_kinds(&machine).is_empty());
    }

    #[test]
    fn test_chords() {
        let cases = [
            (HardwareId::Button01, HardwareId::Button02, EventKind::AllOff),
            (HardwareId::Button03, HardwareId::Button01, EventKind::AllHalf),
            (HardwareId::Button02, HardwareId::Button03, EventKind::AllOn),
        ];
        for (first, second, expected) in cases {
            let mut machine = machine(ColorModel::Rgb);
            machine.process(&press(first));
            machine.process(&press(second));
            assert!(matches!(machine.state(), ControllerState::Chord(_, _)));
            let timeout = expire(&machine);
            machine.process(&timeout);
            assert_eq!(machine.state(), ControllerState::Idle);
            assert_eq!(&sent_kinds(&machine)[..], &[expected]);
        }
    }

    #[test]
    fn test_chord_release_returns_to_other_button() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&press(HardwareId::Button03));
        machine.process(&press(HardwareId::Button01));
        assert_eq!(
            machine.state(),
            ControllerState::Chord(FrontButton::One, FrontButton::Three)
        );
        machine.process(&release(HardwareId::Button01));
        assert_eq!(machine.state(), ControllerState::Pressed(FrontButton::Three));
        machine.process(&release(HardwareId::Button03));
        assert_eq!(&sent_kinds(&machine)[..], &[EventKind::SetBlue]);
    }

    #[test]
    fn test_encoder_forwarded_in_every_state() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&Event::new(HardwareId::RotaryEncoder01, EventKind::RotatedCw, 0));
        machine.process(&press(HardwareId::Button01));
        machine.process(&Event::new(HardwareId::RotaryEncoder01, EventKind::RotatedCcw, 0));
        machine.process(&press(HardwareId::RotaryEncoder01));
        machine.process(&release(HardwareId::RotaryEncoder01));
        assert_eq!(machine.state(), ControllerState::Pressed(FrontButton::One));
        assert_eq!(
            &sent_kinds(&machine)[..],
            &[
                EventKind::ReCw,
                EventKind::ReCcw,
                EventKind::RePressed,
                EventKind::ReReleased
            ]
        );
    }

    #[test]
    fn test_idle_timeout_blanks_display() {
        let mut machine = machine(ColorModel::Rgb);
        let timeout = expire(&machine);
        machine.process(&timeout);
        assert!(machine.handler().io().display_off);
        assert_eq!(machine.state(), ControllerState::Idle);
    }

    #[test]
    fn test_feedback_restarts_idle_timer() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&Event::new(HardwareId::RgbNode, EventKind::LedGreenPwm, 0x80));
        let io = machine.handler().io();
        assert_eq!(io.feedback, Some((EventKind::LedGreenPwm, 0x80)));
        assert_eq!(&io.stopped[..], &[1]);
        assert_eq!(&io.started[..], &[(1, 40_000), (2, 40_000)]);
    }

    #[test]
    fn test_fourth_button_ignored() {
        let mut machine = machine(ColorModel::Rgb);
        machine.process(&press(HardwareId::Button04));
        assert_eq!(machine.state(), ControllerState::Idle);
    }
}
