//! Interrupt-safe event queue
//!
//! Bounded FIFO ring of [`Event`]s. Producers push from interrupt context,
//! the main loop pops. Both sides run inside a critical section, so the ring
//! indices are never observed half-updated.

use prism_protocol::Event;

use crate::error::Error;
use crate::observer::EventObserver;
use crate::sync::Shared;

/// Default queue capacity
pub const QUEUE_CAPACITY: usize = 32;

struct Ring<const N: usize> {
    events: [Event; N],
    /// Oldest element, `None` while empty
    front: Option<usize>,
    /// Next write position
    rear: usize,
    count: usize,
    high_water: usize,
}

impl<const N: usize> Ring<N> {
    const fn new() -> Self {
        Self {
            events: [Event::INVALID; N],
            front: None,
            rear: 0,
            count: 0,
            high_water: 0,
        }
    }

    fn push(&mut self, event: Event) -> Result<(), Error> {
        if self.count == N {
            return Err(Error::QueueFull);
        }
        self.events[self.rear] = event;
        if self.front.is_none() {
            self.front = Some(self.rear);
        }
        self.rear = (self.rear + 1) % N;
        self.count += 1;
        self.high_water = self.high_water.max(self.count);
        Ok(())
    }

    fn pop(&mut self) -> Option<Event> {
        let front = self.front?;
        let event = core::mem::take(&mut self.events[front]);
        self.count -= 1;
        self.front = if self.count == 0 {
            None
        } else {
            Some((front + 1) % N)
        };
        Some(event)
    }
}

/// Bounded FIFO of events shared between interrupt and main context
///
/// A full queue rejects new events; nothing is overwritten and nothing
/// blocks.
pub struct EventQueue<const N: usize = QUEUE_CAPACITY> {
    ring: Shared<Ring<N>>,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            ring: Shared::new(Ring::new()),
        }
    }

    /// Append an event
    ///
    /// # Errors
    /// [`Error::QueueFull`] if `N` events are already stored.
    pub fn enqueue(&self, event: Event) -> Result<(), Error> {
        self.ring.lock(|ring| ring.push(event))
    }

    /// Remove the oldest event
    pub fn dequeue(&self) -> Option<Event> {
        self.ring.lock(|ring| ring.pop())
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.ring.lock(|ring| ring.count)
    }

    /// True if no event is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the next enqueue would fail
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Maximum number of stored events
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Largest number of events ever stored at once
    pub fn high_water_mark(&self) -> usize {
        self.ring.lock(|ring| ring.high_water)
    }
}

impl<const N: usize> EventObserver for EventQueue<N> {
    /// Store the event, dropping it if the queue is full
    fn update(&self, event: &Event) {
        let _ = self.enqueue(*event);
    }
}
