//! Peripheral power manager
//!
//! Tracks which peripherals are in use as a power-reduction mask (a set bit
//! means the peripheral may be powered down) and whether the core is allowed
//! to sleep when the event queue runs dry.

use prism_hal::{Peripheral, PowerRegistrar};

use crate::sync::Shared;

/// Every peripheral powered down
pub const ALL_IDLE: u8 = {
    let mut mask = 0;
    let mut i = 0;
    while i < Peripheral::ALL.len() {
        mask |= Peripheral::ALL[i].mask();
        i += 1;
    }
    mask
};

#[derive(Debug, Clone, Copy)]
struct PowerState {
    reduction: u8,
    allow_sleep: bool,
}

/// Power-reduction bookkeeping
pub struct PowerManager {
    state: Shared<PowerState>,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerManager {
    /// Every peripheral idle, sleep not allowed
    pub const fn new() -> Self {
        Self {
            state: Shared::new(PowerState {
                reduction: ALL_IDLE,
                allow_sleep: false,
            }),
        }
    }

    /// Let the main loop sleep while idle
    pub fn enable_sleep(&self) {
        self.state.lock(|state| state.allow_sleep = true);
    }

    /// Keep the main loop spinning while idle
    pub fn disable_sleep(&self) {
        self.state.lock(|state| state.allow_sleep = false);
    }

    /// True if the main loop may sleep
    pub fn may_sleep(&self) -> bool {
        self.state.lock(|state| state.allow_sleep)
    }

    /// Current power-reduction mask
    pub fn reduction_mask(&self) -> u8 {
        self.state.lock(|state| state.reduction)
    }

    /// True if `peripheral` is registered as in use
    pub fn is_in_use(&self, peripheral: Peripheral) -> bool {
        self.reduction_mask() & peripheral.mask() == 0
    }
}

impl PowerRegistrar for PowerManager {
    fn mark_in_use(&self, peripheral: Peripheral) {
        self.state.lock(|state| state.reduction &= !peripheral.mask());
    }

    fn mark_idle(&self, peripheral: Peripheral) {
        self.state.lock(|state| state.reduction |= peripheral.mask());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_all_idle() {
        let power = PowerManager::new();
        assert_eq!(power.reduction_mask(), 0b1110_1111);
        for peripheral in Peripheral::ALL {
            assert!(!power.is_in_use(peripheral));
        }
        assert!(!power.may_sleep());
    }

    #[test]
    fn test_in_use_clears_bit() {
        let power = PowerManager::new();
        power.mark_in_use(Peripheral::Timer2);
        assert!(power.is_in_use(Peripheral::Timer2));
        assert_eq!(power.reduction_mask(), ALL_IDLE & !(1 << 6));

        power.mark_idle(Peripheral::Timer2);
        assert_eq!(power.reduction_mask(), ALL_IDLE);
    }

    #[test]
    fn test_sleep_flag() {
        let power = PowerManager::new();
        power.enable_sleep();
        assert!(power.may_sleep());
        power.disable_sleep();
        assert!(!power.may_sleep());
    }
}
