//! Periodic tick multiplexer
//!
//! Drives software PWM. The tick timer only runs while at least one observer
//! is attached; the peripheral is claimed from the power registrar for exactly
//! that long.

use prism_hal::{InterruptSource, Peripheral, PowerRegistrar};

use crate::error::Error;
use crate::observer::{SlotTable, TickObserver};
use crate::sync::Shared;

/// Tick observer slots
pub const TICK_SLOTS: usize = 3;

/// Handle returned by [`TickSubject::attach`], needed to detach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObserverId(u8);

impl ObserverId {
    /// Slot index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Something tick observers can register with
pub trait TickSubject<'a>: Sync {
    /// Observe ticks, taking the first free slot
    ///
    /// # Errors
    /// [`Error::ObserverTableFull`] if every slot is taken.
    fn attach(&self, observer: &'a dyn TickObserver) -> Result<ObserverId, Error>;

    /// Stop observing; unknown ids are ignored
    fn detach(&self, id: ObserverId);
}

struct TickState<'a, T> {
    slots: SlotTable<'a, dyn TickObserver + 'a, TICK_SLOTS>,
    counter: u8,
    timer: T,
}

/// Fan-out for the tick timer's compare-match vector
pub struct TickMux<'a, T, P: 'a> {
    state: Shared<TickState<'a, T>>,
    power: &'a P,
    peripheral: Peripheral,
}

impl<'a, T: InterruptSource, P: PowerRegistrar> TickMux<'a, T, P> {
    /// Create a multiplexer for `timer`, registering `peripheral` with `power`
    /// while in use
    pub const fn new(timer: T, power: &'a P, peripheral: Peripheral) -> Self {
        Self {
            state: Shared::new(TickState {
                slots: SlotTable::new(),
                counter: 0,
                timer,
            }),
            power,
            peripheral,
        }
    }

    /// Vector handler
    ///
    /// Observers receive the counter value before it is incremented, so the
    /// first tick after the timer starts is 0.
    pub fn notify(&self) {
        let (observers, tick) = self.state.lock(|state| {
            let tick = state.counter;
            state.counter = state.counter.wrapping_add(1);
            (state.slots.snapshot(), tick)
        });
        for observer in observers.iter().flatten() {
            observer.on_tick(tick);
        }
    }

    /// Number of attached observers
    pub fn observer_count(&self) -> usize {
        self.state.lock(|state| state.slots.count())
    }

    /// Inspect the timer control
    pub fn timer<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.state.lock(|state| f(&state.timer))
    }
}

impl<'a, T, P> TickSubject<'a> for TickMux<'a, T, P>
where
    T: InterruptSource + Send,
    P: PowerRegistrar + Sync,
{
    fn attach(&self, observer: &'a dyn TickObserver) -> Result<ObserverId, Error> {
        self.state.lock(|state| {
            let index = state.slots.insert_first_free(observer)?;
            if state.slots.count() == 1 {
                self.power.mark_in_use(self.peripheral);
                state.counter = 0;
                state.timer.enable();
            }
            // Slot indices are below TICK_SLOTS
            Ok(ObserverId(index as u8))
        })
    }

    fn detach(&self, id: ObserverId) {
        self.state.lock(|state| {
            if state.slots.remove(id.index()) && state.slots.count() == 0 {
                state.timer.disable();
                self.power.mark_idle(self.peripheral);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeTimer {
        enables: usize,
        disables: usize,
    }

    impl InterruptSource for FakeTimer {
        fn enable(&mut self) {
            self.enables += 1;
        }

        fn disable(&mut self) {
            self.disables += 1;
        }
    }

    #[derive(Default)]
    struct FakePower {
        in_use: AtomicUsize,
        idle: AtomicUsize,
    }

    impl PowerRegistrar for FakePower {
        fn mark_in_use(&self, peripheral: Peripheral) {
            assert_eq!(peripheral, Peripheral::Timer2);
            self.in_use.fetch_add(1, Ordering::Relaxed);
        }

        fn mark_idle(&self, peripheral: Peripheral) {
            assert_eq!(peripheral, Peripheral::Timer2);
            self.idle.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[derive(Default)]
    struct LastTick {
        calls: AtomicUsize,
        tick: AtomicU8,
    }

    impl TickObserver for LastTick {
        fn on_tick(&self, tick: u8) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.tick.store(tick, Ordering::Relaxed);
        }
    }

    fn counts(power: &FakePower) -> (usize, usize) {
        (
            power.in_use.load(Ordering::Relaxed),
            power.idle.load(Ordering::Relaxed),
        )
    }

    #[test]
    fn test_reference_counted_power() {
        let power = FakePower::default();
        let (a, b) = (LastTick::default(), LastTick::default());
        let mux = TickMux::new(FakeTimer::default(), &power, Peripheral::Timer2);

        let id_a = mux.attach(&a).unwrap();
        assert_eq!(counts(&power), (1, 0));
        assert_eq!(mux.timer(|t| t.enables), 1);

        let id_b = mux.attach(&b).unwrap();
        assert_eq!(counts(&power), (1, 0));
        assert_eq!(mux.timer(|t| t.enables), 1);

        mux.detach(id_a);
        assert_eq!(counts(&power), (1, 0));
        assert_eq!(mux.timer(|t| t.disables), 0);

        mux.detach(id_b);
        assert_eq!(counts(&power), (1, 1));
        assert_eq!(mux.timer(|t| t.disables), 1);
    }

    #[test]
    fn test_table_full() {
        let power = FakePower::default();
        let ticks = [
            LastTick::default(),
            LastTick::default(),
            LastTick::default(),
            LastTick::default(),
        ];
        let mux = TickMux::new(FakeTimer::default(), &power, Peripheral::Timer2);

        let ids: [ObserverId; 3] = [
            mux.attach(&ticks[0]).unwrap(),
            mux.attach(&ticks[1]).unwrap(),
            mux.attach(&ticks[2]).unwrap(),
        ];
        assert_eq!(ids.map(ObserverId::index), [0, 1, 2]);
        assert_eq!(mux.attach(&ticks[3]), Err(Error::ObserverTableFull));
        assert_eq!(mux.observer_count(), 3);
        assert_eq!(counts(&power), (1, 0));
    }

    #[test]
    fn test_detach_unknown_id_ignored() {
        let power = FakePower::default();
        let a = LastTick::default();
        let mux = TickMux::new(FakeTimer::default(), &power, Peripheral::Timer2);

        mux.detach(ObserverId(7));
        mux.detach(ObserverId(1));
        assert_eq!(counts(&power), (0, 0));

        let id = mux.attach(&a).unwrap();
        mux.detach(id);
        mux.detach(id);
        assert_eq!(counts(&power), (1, 1));
        assert_eq!(mux.timer(|t| t.disables), 1);
    }

    #[test]
    fn test_tick_counter_starts_at_zero_and_wraps() {
        let power = FakePower::default();
        let a = LastTick::default();
        let mux = TickMux::new(FakeTimer::default(), &power, Peripheral::Timer2);

        mux.attach(&a).unwrap();
        mux.notify();
        assert_eq!(a.tick.load(Ordering::Relaxed), 0);

        for _ in 0..255 {
            mux.notify();
        }
        assert_eq!(a.tick.load(Ordering::Relaxed), 255);
        mux.notify();
        assert_eq!(a.tick.load(Ordering::Relaxed), 0);
        assert_eq!(a.calls.load(Ordering::Relaxed), 257);
    }

    #[test]
    fn test_counter_resets_on_restart() {
        let power = FakePower::default();
        let a = LastTick::default();
        let mux = TickMux::new(FakeTimer::default(), &power, Peripheral::Timer2);

        let id = mux.attach(&a).unwrap();
        for _ in 0..10 {
            mux.notify();
        }
        mux.detach(id);
        mux.attach(&a).unwrap();
        mux.notify();
        assert_eq!(a.tick.load(Ordering::Relaxed), 0);
    }
}
