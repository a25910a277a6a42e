//! Cache Invalidator
//!
//! Translates list updates into Diff Cache mutations. The invalidator holds
//! no state besides its policy; every update is applied on its own, in the
//! order given, against whatever the cache currently holds.
//!
//! Rules, with `before`/`after` taken from the policy's [`Neighborhood`]:
//!
//! - `Changed(p, n)`: slots `[p, p + n)` are invalidated. Neighbors are left
//!   alone; a differ reports every position whose rendering changed.
//! - `Inserted(p, n)`: the slots whose window reaches across the insertion
//!   gap are invalidated (`after` slots left of `p`, `before` slots from
//!   `p` on), then `n` absent slots are inserted at `p`.
//! - `Removed(p, n)`: the `after` slots left of the run and the `before`
//!   slots right of it are invalidated, then the run is removed.
//! - `Moved(from, to)`: the slot moves with its value. Under
//!   [`MoveInvalidation::Around`] the neighbors of both the vacated and the
//!   destination position are invalidated too, along with the moved slot.
//!
//! An update that does not fit the cache is a broken diff stream. [`apply`]
//! panics on it; [`try_apply`] returns [`DiffError::OutOfBounds`].
//!
//! [`apply`]: CacheInvalidator::apply
//! [`try_apply`]: CacheInvalidator::try_apply

use std::ops::Range;

use listdiff::{ListUpdate, ListUpdateCallback};

use crate::cache::DiffCache;
use crate::error::{DiffError, Result};
use crate::policy::{InvalidationPolicy, MoveInvalidation, Neighborhood};

/// Applies list updates to a [`DiffCache`] under an [`InvalidationPolicy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheInvalidator {
    policy: InvalidationPolicy,
}

impl CacheInvalidator {
    pub fn new(policy: InvalidationPolicy) -> CacheInvalidator {
        return CacheInvalidator { policy };
    }

    pub fn policy(&self) -> InvalidationPolicy {
        return self.policy;
    }

    /// Apply one update. Returns how many cached values were dropped.
    ///
    /// # Panics
    ///
    /// If the update addresses positions outside the cache.
    pub fn apply<V>(&self, cache: &mut DiffCache<V>, update: &ListUpdate) -> usize {
        return match self.try_apply(cache, update) {
            Ok(dropped) => dropped,
            Err(err) => panic!("inconsistent diff: {err}"),
        };
    }

    /// Apply one update, or leave the cache untouched and report why it
    /// does not fit.
    pub fn try_apply<V>(&self, cache: &mut DiffCache<V>, update: &ListUpdate) -> Result<usize> {
        if !update.fits(cache.len()) {
            return Err(DiffError::OutOfBounds { update: *update, len: cache.len() });
        }
        return Ok(self.apply_unchecked(cache, update));
    }

    /// Apply a whole batch in order.
    ///
    /// # Panics
    ///
    /// If any update of the batch does not fit; the cache is not modified in
    /// that case.
    pub fn apply_batch<V>(&self, cache: &mut DiffCache<V>, updates: &[ListUpdate]) -> usize {
        return match self.try_apply_batch(cache, updates) {
            Ok(dropped) => dropped,
            Err(err) => panic!("inconsistent diff: {err}"),
        };
    }

    /// Apply a whole batch in order, all or nothing.
    ///
    /// Every update is checked against the length the cache will have at
    /// that point of the batch before anything is mutated, so a rejected
    /// batch leaves the cache exactly as it was.
    pub fn try_apply_batch<V>(&self, cache: &mut DiffCache<V>, updates: &[ListUpdate]) -> Result<usize> {
        let mut len = cache.len();
        for update in updates {
            len = update
                .apply_len(len)
                .ok_or(DiffError::OutOfBounds { update: *update, len })?;
        }

        let mut dropped = 0;
        for update in updates {
            dropped += self.apply_unchecked(cache, update);
        }
        return Ok(dropped);
    }

    /// Borrow `cache` as a [`ListUpdateCallback`], so a differ can dispatch
    /// straight into it.
    pub fn bind<'a, V>(&'a self, cache: &'a mut DiffCache<V>) -> Invalidating<'a, V> {
        return Invalidating { invalidator: self, cache, dropped: 0 };
    }

    fn apply_unchecked<V>(&self, cache: &mut DiffCache<V>, update: &ListUpdate) -> usize {
        let neighborhood = self.policy.neighborhood;
        let dropped = match *update {
            ListUpdate::Changed { position, count } => cache.invalidate_range(position..position + count),
            ListUpdate::Moved { from, to } => self.apply_move(cache, from, to),
            ListUpdate::Inserted { position, count } => {
                if count == 0 {
                    return 0;
                }
                let dropped = invalidate_gap(cache, position..position, neighborhood);
                cache.insert_at(position, count);
                dropped
            }
            ListUpdate::Removed { position, count } => {
                if count == 0 {
                    return 0;
                }
                let dropped = invalidate_gap(cache, position..position + count, neighborhood);
                cache.remove_at(position, count);
                dropped
            }
        };
        tracing::debug!(%update, dropped, len = cache.len(), "applied list update");
        return dropped;
    }

    fn apply_move<V>(&self, cache: &mut DiffCache<V>, from: usize, to: usize) -> usize {
        if from == to {
            return 0;
        }
        return match self.policy.moves {
            MoveInvalidation::Preserve => {
                cache.move_slot(from, to);
                0
            }
            MoveInvalidation::Around => {
                let neighborhood = self.policy.neighborhood;
                let mut dropped = cache.invalidate_around(from, neighborhood);
                cache.move_slot(from, to);
                dropped += cache.invalidate_around(to, neighborhood);
                if cache.invalidate(to) {
                    dropped += 1;
                }
                dropped
            }
        };
    }
}

/// Invalidate the slots whose window reaches across `gap`: the `after`
/// slots ending at `gap.start` and the `before` slots starting at `gap.end`.
/// An empty gap is an insertion point.
fn invalidate_gap<V>(cache: &mut DiffCache<V>, gap: Range<usize>, neighborhood: Neighborhood) -> usize {
    let ranges: [Range<usize>; 2] = [
        gap.start.saturating_sub(neighborhood.after)..gap.start,
        gap.end..gap.end.saturating_add(neighborhood.before),
    ];
    tracing::trace!(?gap, ?ranges, "invalidating neighbors");
    return ranges.into_iter().map(|range| cache.invalidate_range(range)).sum();
}

/// A [`DiffCache`] bound to a [`CacheInvalidator`], receiving updates
/// through [`ListUpdateCallback`].
///
/// Each call panics if the update does not fit, like
/// [`CacheInvalidator::apply`].
pub struct Invalidating<'a, V> {
    invalidator: &'a CacheInvalidator,
    cache: &'a mut DiffCache<V>,
    dropped: usize,
}

impl<V> Invalidating<'_, V> {
    /// Cached values dropped so far through this binding.
    pub fn dropped(&self) -> usize {
        return self.dropped;
    }

    fn apply(&mut self, update: ListUpdate) {
        self.dropped += self.invalidator.apply(self.cache, &update);
    }
}

impl<V> ListUpdateCallback for Invalidating<'_, V> {
    fn on_changed(&mut self, position: usize, count: usize) {
        self.apply(ListUpdate::Changed { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.apply(ListUpdate::Moved { from, to });
    }

    fn on_inserted(&mut self, position: usize, count: usize) {
        self.apply(ListUpdate::Inserted { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.apply(ListUpdate::Removed { position, count });
    }
}
