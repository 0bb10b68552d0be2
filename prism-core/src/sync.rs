//! Interrupt-safe shared state
//!
//! Everything touched from both an interrupt handler and the main loop lives
//! in a [`Shared`]. Access happens inside a critical section, which restores
//! the previous interrupt state when the closure returns, on every path.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};

/// State shared between interrupt and main context
pub struct Shared<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> Shared<T> {
    /// Wrap a value
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access, interrupts masked
    ///
    /// `f` must not call back into the same `Shared`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| self.lock_in(cs, f))
    }

    /// Run `f` with exclusive access inside an already-held critical section
    pub fn lock_in<R>(&self, cs: CriticalSection<'_>, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_ref_mut(cs))
    }

    /// Consume and return the inner value
    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
