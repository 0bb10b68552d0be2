//! Single-observer subject

use prism_protocol::Event;

use super::EventObserver;
use crate::sync::Shared;

/// Subject with at most one observer
///
/// Attaching replaces any current observer. Notifying with no observer
/// attached does nothing.
pub struct Subject<'a, O: ?Sized + 'a> {
    observer: Shared<Option<&'a O>>,
}

/// Single-observer publisher of [`Event`]s
pub type EventBus<'a> = Subject<'a, dyn EventObserver + 'a>;

impl<'a, O: ?Sized + 'a> Default for Subject<'a, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, O: ?Sized + 'a> Subject<'a, O> {
    /// Create a subject with no observer
    pub const fn new() -> Self {
        Self {
            observer: Shared::new(None),
        }
    }

    /// Attach `observer`, replacing any current one
    pub fn attach(&self, observer: &'a O) {
        self.observer.lock(|slot| *slot = Some(observer));
    }

    /// Remove the current observer
    pub fn detach(&self) {
        self.observer.lock(|slot| *slot = None);
    }

    /// True if an observer is attached
    pub fn is_attached(&self) -> bool {
        self.observer.lock(|slot| slot.is_some())
    }

    /// Current observer, read under the lock and used outside it
    pub fn observer(&self) -> Option<&'a O> {
        self.observer.lock(|slot| *slot)
    }
}

impl<'a> Subject<'a, dyn EventObserver + 'a> {
    /// Deliver `event` to the observer, if any
    pub fn notify(&self, event: &Event) {
        if let Some(observer) = self.observer() {
            observer.update(event);
        }
    }
}
