//! Fixed-size observer slot table

use crate::error::Error;

/// Array of optional observers with a cached occupancy count
///
/// The count always equals the number of occupied slots. Callers use the
/// transitions of the count (0 to 1, 1 to 0) to switch hardware on and off.
pub struct SlotTable<'a, O: ?Sized + 'a, const N: usize> {
    slots: [Option<&'a O>; N],
    count: usize,
}

impl<'a, O: ?Sized + 'a, const N: usize> Default for SlotTable<'a, O, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, O: ?Sized + 'a, const N: usize> SlotTable<'a, O, N> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            slots: [None; N],
            count: 0,
        }
    }

    /// Put `observer` in slot `index`
    ///
    /// Returns true if the slot was empty. Replacing an occupied slot leaves
    /// the count unchanged.
    pub fn insert_at(&mut self, index: usize, observer: &'a O) -> Result<bool, Error> {
        let slot = self.slots.get_mut(index).ok_or(Error::SlotOutOfRange)?;
        let was_empty = slot.replace(observer).is_none();
        if was_empty {
            self.count += 1;
        }
        Ok(was_empty)
    }

    /// Put `observer` in the lowest free slot and return its index
    pub fn insert_first_free(&mut self, observer: &'a O) -> Result<usize, Error> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(Error::ObserverTableFull)?;
        self.slots[index] = Some(observer);
        self.count += 1;
        Ok(index)
    }

    /// Empty slot `index`
    ///
    /// Returns true if an observer was removed. Out-of-range and empty slots
    /// are ignored.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index).and_then(Option::take) {
            Some(_) => {
                self.count -= 1;
                true
            }
            None => false,
        }
    }

    /// True if slot `index` holds an observer
    pub fn is_occupied(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Number of occupied slots
    pub fn count(&self) -> usize {
        self.count
    }

    /// Copy of the slots, for notifying outside the lock
    pub fn snapshot(&self) -> [Option<&'a O>; N] {
        self.slots
    }
}
