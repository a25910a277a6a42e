//! Diff Cache
//!
//! One optional cached value per position of a source list. A slot is
//! `None` when its value was never computed or has been invalidated.
//!
//! The cache does not know the source list; it only mirrors its shape. The
//! structural operations (`insert_at`, `remove_at`, `move_slot`) exist so
//! the invalidator can keep `len()` equal to the source list length after
//! every applied update. They assert their bounds: an out-of-range position
//! means the update stream and the cache disagree, and carrying on would
//! serve stale values from the wrong rows.
//!
//! Reads never panic. `get` past the end is simply a miss.

use std::ops::Range;

use crate::policy::Neighborhood;

/// Positional slot array of optional cached values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffCache<V> {
    slots: Vec<Option<V>>,
}

impl<V> Default for DiffCache<V> {
    fn default() -> Self {
        return DiffCache::new();
    }
}

impl<V> DiffCache<V> {
    /// An empty cache, for an empty source list.
    pub fn new() -> DiffCache<V> {
        return DiffCache { slots: Vec::new() };
    }

    /// A cache of `len` absent slots.
    pub fn with_len(len: usize) -> DiffCache<V> {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        return DiffCache { slots };
    }

    pub fn len(&self) -> usize {
        return self.slots.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.slots.is_empty();
    }

    /// Index of the last slot, `None` for an empty cache.
    pub fn last_valid_index(&self) -> Option<usize> {
        return self.slots.len().checked_sub(1);
    }

    /// The cached value at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&V> {
        return self.slots.get(position).and_then(Option::as_ref);
    }

    /// Overwrite the slot at `position`, returning what it held.
    ///
    /// Setting `None` is how a single slot is invalidated.
    pub fn set(&mut self, position: usize, value: Option<V>) -> Option<V> {
        let len = self.slots.len();
        assert!(position < len, "set at {position} on a cache of {len} slots");
        return std::mem::replace(&mut self.slots[position], value);
    }

    /// The cached value at `position`, computing and storing it on a miss.
    ///
    /// `build` may return `None`, in which case the slot stays absent and
    /// the next read computes again.
    pub fn get_or_insert_with(&mut self, position: usize, build: impl FnOnce() -> Option<V>) -> Option<&V> {
        let len = self.slots.len();
        assert!(position < len, "read-through at {position} on a cache of {len} slots");
        if self.slots[position].is_none() {
            self.slots[position] = build();
        }
        return self.slots[position].as_ref();
    }

    /// Invalidate a single slot. Returns whether a value was dropped.
    pub fn invalidate(&mut self, position: usize) -> bool {
        return self.set(position, None).is_some();
    }

    /// Invalidate every slot of `range` that exists. Returns how many values
    /// were dropped.
    pub fn invalidate_range(&mut self, range: Range<usize>) -> usize {
        let end = range.end.min(self.slots.len());
        let start = range.start.min(end);
        let mut dropped = 0;
        for slot in &mut self.slots[start..end] {
            if slot.take().is_some() {
                dropped += 1;
            }
        }
        return dropped;
    }

    /// Invalidate the slots whose window reads `position`: the `after`
    /// slots before it and the `before` slots after it. The slot itself is
    /// kept. Never reaches below zero or past the last slot.
    pub fn invalidate_around(&mut self, position: usize, neighborhood: Neighborhood) -> usize {
        let left = position.saturating_sub(neighborhood.after)..position;
        let right = position.saturating_add(1)..position.saturating_add(1).saturating_add(neighborhood.before);
        return self.invalidate_range(left) + self.invalidate_range(right);
    }

    /// Grow by `count` absent slots starting at `position`; existing slots
    /// at or after `position` shift up by `count`.
    pub fn insert_at(&mut self, position: usize, count: usize) {
        let len = self.slots.len();
        assert!(position <= len, "insert at {position} past the end of a cache of {len} slots");
        if count == 0 {
            return;
        }
        self.slots.splice(position..position, std::iter::repeat_with(|| None).take(count));
    }

    /// Shrink by removing `count` slots starting at `position`; later slots
    /// shift down by `count`.
    pub fn remove_at(&mut self, position: usize, count: usize) {
        let len = self.slots.len();
        let end = position.checked_add(count);
        assert!(
            end.is_some_and(|end| end <= len),
            "remove of {count} at {position} past the end of a cache of {len} slots"
        );
        self.slots.drain(position..position + count);
    }

    /// Move the slot at `from` to `to`, value and all. Slots in between
    /// shift by one toward the vacated position.
    pub fn move_slot(&mut self, from: usize, to: usize) {
        let len = self.slots.len();
        assert!(from < len && to < len, "move {from} -> {to} on a cache of {len} slots");
        if from < to {
            self.slots[from..=to].rotate_left(1);
        } else if to < from {
            self.slots[to..=from].rotate_right(1);
        }
    }

    /// Invalidate everything, keeping the length.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Drop everything and resize to `len` absent slots. Used to resync
    /// after a batch was rejected.
    pub fn reset(&mut self, len: usize) {
        self.slots.clear();
        self.slots.resize_with(len, || None);
    }

    /// Slots in position order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&V>> + '_ {
        return self.slots.iter().map(Option::as_ref);
    }

    /// Number of slots currently holding a value.
    pub fn valid_count(&self) -> usize {
        return self.slots.iter().filter(|slot| slot.is_some()).count();
    }
}

impl<V> FromIterator<Option<V>> for DiffCache<V> {
    fn from_iter<I: IntoIterator<Item = Option<V>>>(iter: I) -> Self {
        return DiffCache { slots: iter.into_iter().collect() };
    }
}
