//! Read-through timeline presenter.
//!
//! Keeps a rendered view of an ordered list of raw items (timeline events,
//! gallery entries) without rebuilding every row on every change:
//!
//! 1. a new snapshot of the raw items arrives,
//! 2. it is diffed against the previous snapshot,
//! 3. the resulting updates are dispatched into the [`DiffCache`], which
//!    reshapes and drops the values that can no longer be trusted,
//! 4. the view is rebuilt by reading every slot, calling the
//!    [`ItemFactory`] only where the slot is empty.
//!
//! The presenter is the single owner of the cache. Everything that mutates
//! it takes `&mut self`, so a batch of updates is always applied completely
//! before the next read.

use std::marker::PhantomData;
use std::time::Instant;

use listdiff::{calculate_diff, Diffable, ListUpdate, SliceDiff};

use crate::cache::DiffCache;
use crate::error::DiffError;
use crate::invalidator::CacheInvalidator;
use crate::policy::InvalidationPolicy;
use crate::stats::CacheStats;

// =============================================================================
// Neighbors
// =============================================================================

/// An item of a list together with access to the items around it.
#[derive(Debug)]
pub struct Neighbors<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<T> Clone for Neighbors<'_, T> {
    fn clone(&self) -> Self {
        return *self;
    }
}

impl<T> Copy for Neighbors<'_, T> {}

impl<'a, T> Neighbors<'a, T> {
    pub fn new(items: &'a [T], index: usize) -> Neighbors<'a, T> {
        assert!(index < items.len(), "index {index} out of a list of {} items", items.len());
        return Neighbors { items, index };
    }

    pub fn index(&self) -> usize {
        return self.index;
    }

    pub fn item(&self) -> &'a T {
        return &self.items[self.index];
    }

    /// The whole list.
    pub fn items(&self) -> &'a [T] {
        return self.items;
    }

    pub fn previous(&self) -> Option<&'a T> {
        return self.index.checked_sub(1).map(|i| &self.items[i]);
    }

    pub fn next(&self) -> Option<&'a T> {
        return self.items.get(self.index + 1);
    }

    /// Up to `n` items immediately before this one, in list order.
    pub fn before(&self, n: usize) -> &'a [T] {
        return &self.items[self.index.saturating_sub(n)..self.index];
    }

    /// Up to `n` items immediately after this one, in list order.
    pub fn after(&self, n: usize) -> &'a [T] {
        let start = self.index + 1;
        let end = start.saturating_add(n).min(self.items.len());
        return &self.items[start..end];
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds the derived value of one list position.
///
/// Returning `None` means the position renders nothing. Nothing is cached
/// for it, so it is asked again on the next read.
pub trait ItemFactory<T> {
    type Output;

    fn build(&mut self, window: Neighbors<'_, T>) -> Option<Self::Output>;
}

/// [`ItemFactory`] backed by a closure. See [`factory_fn`].
pub struct FnFactory<F, V> {
    build: F,
    _output: PhantomData<fn() -> V>,
}

/// Wrap a closure as an [`ItemFactory`].
pub fn factory_fn<T, V, F>(build: F) -> FnFactory<F, V>
where
    F: FnMut(Neighbors<'_, T>) -> Option<V>,
{
    return FnFactory { build, _output: PhantomData };
}

impl<T, V, F> ItemFactory<T> for FnFactory<F, V>
where
    F: FnMut(Neighbors<'_, T>) -> Option<V>,
{
    type Output = V;

    fn build(&mut self, window: Neighbors<'_, T>) -> Option<V> {
        return (self.build)(window);
    }
}

// =============================================================================
// Presenter
// =============================================================================

/// Maintains derived values for an ordered list across snapshot changes.
pub struct TimelinePresenter<T, F: ItemFactory<T>> {
    /// The last snapshot, used for diffing.
    items: Vec<T>,
    cache: DiffCache<F::Output>,
    invalidator: CacheInvalidator,
    factory: F,
    stats: CacheStats,
}

impl<T, F> TimelinePresenter<T, F>
where
    T: Diffable,
    F: ItemFactory<T>,
    F::Output: Clone,
{
    pub fn new(factory: F) -> TimelinePresenter<T, F> {
        return TimelinePresenter::with_policy(factory, InvalidationPolicy::default());
    }

    pub fn with_policy(factory: F, policy: InvalidationPolicy) -> TimelinePresenter<T, F> {
        return TimelinePresenter {
            items: Vec::new(),
            cache: DiffCache::new(),
            invalidator: CacheInvalidator::new(policy),
            factory,
            stats: CacheStats::default(),
        };
    }

    /// Replace the whole list and return the rebuilt view, newest first.
    pub fn replace_with(&mut self, items: Vec<T>) -> Vec<F::Output> {
        self.apply_diff(items);
        return self.snapshot();
    }

    /// Append one item and return the rebuilt view, newest first.
    ///
    /// Skips diffing: the append is a known `Inserted` at the end.
    pub fn push_item(&mut self, item: T) -> Vec<F::Output> {
        let update = ListUpdate::Inserted { position: self.items.len(), count: 1 };
        let dropped = self.invalidator.apply(&mut self.cache, &update);
        self.items.push(item);
        self.stats.updates += 1;
        self.stats.invalidated += dropped as u64;
        return self.snapshot();
    }

    /// Read every position, building the missing values, newest first.
    ///
    /// Positions whose factory returns `None` are left out.
    pub fn snapshot(&mut self) -> Vec<F::Output> {
        let mut values = Vec::with_capacity(self.items.len());
        for index in (0..self.items.len()).rev() {
            let mut missed = false;
            let items = &self.items;
            let factory = &mut self.factory;
            let value = self.cache.get_or_insert_with(index, || {
                missed = true;
                factory.build(Neighbors::new(items, index))
            });
            if let Some(value) = value {
                values.push(value.clone());
            }
            if missed {
                self.stats.miss();
            } else {
                self.stats.hit();
            }
        }
        return values;
    }

    fn apply_diff(&mut self, items: Vec<T>) {
        let started = Instant::now();
        let diff = calculate_diff(&SliceDiff::new(&self.items, &items));

        let mut bound = self.invalidator.bind(&mut self.cache);
        diff.dispatch_updates_to(&mut bound);
        let dropped = bound.dropped();

        self.items = items;
        if self.cache.len() != self.items.len() {
            let err = DiffError::LengthMismatch { expected: self.items.len(), actual: self.cache.len() };
            panic!("inconsistent diff: {err}");
        }

        self.stats.updates += diff.updates().len() as u64;
        self.stats.invalidated += dropped as u64;
        tracing::debug!(
            items = self.items.len(),
            updates = diff.updates().len(),
            dropped,
            elapsed = ?started.elapsed(),
            "applied diff on new list"
        );
    }

    /// The current snapshot, in list order.
    pub fn items(&self) -> &[T] {
        return &self.items;
    }

    pub fn len(&self) -> usize {
        return self.items.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }

    pub fn cache(&self) -> &DiffCache<F::Output> {
        return &self.cache;
    }

    pub fn factory(&self) -> &F {
        return &self.factory;
    }

    pub fn stats(&self) -> &CacheStats {
        return &self.stats;
    }

    pub fn policy(&self) -> InvalidationPolicy {
        return self.invalidator.policy();
    }
}
