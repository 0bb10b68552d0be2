//! Engine and handler trait
//!
//! All application behavior is a function of the current state and an event.

use prism_protocol::Event;

/// Application behavior, one `match` on the current state
pub trait StateHandler {
    /// State identifier
    type State: Copy + PartialEq;

    /// Handle `event` in `state`
    ///
    /// Enter and exit events are delivered here too, with
    /// `HardwareId::StateMachine` as their source. Transitions requested while
    /// handling them are ignored.
    fn handle(&mut self, state: Self::State, event: &Event, transition: &mut Transition<Self::State>);
}

/// Transition request token handed to [`StateHandler::handle`]
///
/// Only the last request made during one call takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    target: Option<S>,
}

impl<S: Copy> Transition<S> {
    fn new() -> Self {
        Self { target: None }
    }

    /// Move to `target` once the handler returns
    pub fn request(&mut self, target: S) {
        self.target = Some(target);
    }

    /// Withdraw any request made so far
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Requested target, if any
    pub fn target(&self) -> Option<S> {
        self.target
    }
}

/// Event-driven state machine
pub struct StateMachine<H: StateHandler> {
    handler: H,
    state: H::State,
    started: bool,
}

impl<H: StateHandler> StateMachine<H> {
    /// Create a machine in `initial`; no event is delivered until
    /// [`start`](Self::start)
    pub fn new(handler: H, initial: H::State) -> Self {
        Self {
            handler,
            state: initial,
            started: false,
        }
    }

    /// Deliver the enter event to the initial state
    ///
    /// Only the first call has an effect.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.enter();
        }
    }

    /// True once [`start`](Self::start) has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Dispatch `event` to the current state
    ///
    /// Returns true if the handler requested a transition, in which case the
    /// exit and enter events have already been delivered.
    pub fn process(&mut self, event: &Event) -> bool {
        let mut transition = Transition::new();
        self.handler.handle(self.state, event, &mut transition);
        match transition.target() {
            Some(target) => {
                self.switch(target);
                true
            }
            None => false,
        }
    }

    /// Immediately leave the current state for `target`
    ///
    /// For use outside any handler, e.g. a fault detected by the main loop.
    pub fn force_transition(&mut self, target: H::State) {
        self.switch(target);
    }

    /// Current state
    pub fn state(&self) -> H::State {
        self.state
    }

    /// Application behavior
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Application behavior, mutably
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn switch(&mut self, target: H::State) {
        let mut ignored = Transition::new();
        self.handler.handle(self.state, &Event::exit_state(), &mut ignored);
        self.state = target;
        self.enter();
    }

    fn enter(&mut self) {
        let mut ignored = Transition::new();
        self.handler.handle(self.state, &Event::enter_state(), &mut ignored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use prism_protocol::{EventKind, HardwareId};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        On,
        Blink,
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<(Light, EventKind), 16>,
    }

    impl StateHandler for Recorder {
        type State = Light;

        fn handle(&mut self, state: Light, event: &Event, transition: &mut Transition<Light>) {
            self.log.push((state, event.kind)).unwrap();
            match (state, event.kind) {
                (Light::Off, EventKind::ButtonPressed) => transition.request(Light::On),
                (Light::On, EventKind::ButtonPressed) => {
                    transition.request(Light::Off);
                    transition.request(Light::Blink);
                }
                (Light::On, EventKind::TimerExpire) => {
                    transition.request(Light::Off);
                    transition.cancel();
                }
                (Light::Blink, EventKind::EnterState) => transition.request(Light::Off),
                (Light::Blink, EventKind::TimerExpire) => transition.request(Light::Blink),
                _ => {}
            }
        }
    }

    fn press() -> Event {
        Event::new(HardwareId::Button01, EventKind::ButtonPressed, 0)
    }

    fn expire() -> Event {
        Event::new(HardwareId::Timer01, EventKind::TimerExpire, 0)
    }

    #[test]
    fn test_start_enters_initial_once() {
        let mut machine = StateMachine::new(Recorder::default(), Light::Off);
        assert!(machine.handler().log.is_empty());
        machine.start();
        machine.start();
        assert!(machine.is_started());
        assert_eq!(&machine.handler().log[..], &[(Light::Off, EventKind::EnterState)]);
    }

    #[test]
    fn test_exit_then_enter_within_process() {
        let mut machine = StateMachine::new(Recorder::default(), Light::Off);
        assert!(machine.process(&press()));
        assert_eq!(machine.state(), Light::On);
        assert_eq!(
            &machine.handler().log[..],
            &[
                (Light::Off, EventKind::ButtonPressed),
                (Light::Off, EventKind::ExitState),
                (Light::On, EventKind::EnterState),
            ]
        );
    }

    #[test]
    fn test_last_request_wins() {
        let mut machine = StateMachine::new(Recorder::default(), Light::On);
        machine.process(&press());
        assert_eq!(machine.state(), Light::Blink);
        let exits = machine
            .handler()
            .log
            .iter()
            .filter(|(_, kind)| *kind == EventKind::ExitState)
            .count();
        assert_eq!(exits, 1);
    }

    #[test]
    fn test_request_during_enter_ignored() {
        let mut machine = StateMachine::new(Recorder::default(), Light::On);
        machine.process(&press());
        // Blink asks for Off on entry, which must not happen
        assert_eq!(machine.state(), Light::Blink);
    }

    #[test]
    fn test_cancelled_request() {
        let mut machine = StateMachine::new(Recorder::default(), Light::On);
        assert!(!machine.process(&expire()));
        assert_eq!(machine.state(), Light::On);
        assert_eq!(machine.handler().log.len(), 1);
    }

    #[test]
    fn test_self_transition_reenters() {
        let mut machine = StateMachine::new(Recorder::default(), Light::Blink);
        assert!(machine.process(&expire()));
        assert_eq!(machine.state(), Light::Blink);
        assert_eq!(
            &machine.handler().log[1..],
            &[
                (Light::Blink, EventKind::ExitState),
                (Light::Blink, EventKind::EnterState),
            ]
        );
    }

    #[test]
    fn test_no_transition_no_synthesized_events() {
        let mut machine = StateMachine::new(Recorder::default(), Light::Off);
        assert!(!machine.process(&expire()));
        assert_eq!(&machine.handler().log[..], &[(Light::Off, EventKind::TimerExpire)]);
    }

    #[test]
    fn test_force_transition() {
        let mut machine = StateMachine::new(Recorder::default(), Light::On);
        machine.force_transition(Light::Off);
        assert_eq!(machine.state(), Light::Off);
        assert_eq!(
            &machine.handler().log[..],
            &[
                (Light::On, EventKind::ExitState),
                (Light::Off, EventKind::EnterState),
            ]
        );
    }

    #[test]
    fn test_enter_exit_events_tagged() {
        assert_eq!(Event::enter_state().hardware, HardwareId::StateMachine);
        assert_eq!(Event::exit_state().hardware, HardwareId::StateMachine);
    }
}
