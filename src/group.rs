//! Group positions of consecutive items from the same sender.
//!
//! A timeline renders runs of messages from one sender as a visual group:
//! the avatar and name on the first item, tighter spacing in the middle,
//! a tail on the last. Where an item sits in its group depends on the
//! sender of its previous and next items, which makes it the typical
//! neighbor-dependent value kept in a [`DiffCache`](crate::cache::DiffCache).

use crate::timeline::Neighbors;

/// Where an item sits within a run of items sharing a group key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupPosition {
    First,
    Middle,
    Last,
    /// Not part of a multi-item run.
    None,
}

impl GroupPosition {
    /// Compute the position of the current item of `window`.
    ///
    /// `key` returns the group key of an item (typically the sender), or
    /// `None` for items that never group, such as day separators. Those
    /// break runs on both sides.
    pub fn compute<T, K, F>(window: &Neighbors<'_, T>, key: F) -> GroupPosition
    where
        K: PartialEq,
        F: Fn(&T) -> Option<K>,
    {
        let Some(current) = key(window.item()) else {
            return GroupPosition::None;
        };
        let previous = window.previous().and_then(&key);
        let next = window.next().and_then(&key);
        let joins_previous = previous.as_ref() == Some(&current);
        let joins_next = next.as_ref() == Some(&current);

        return match (joins_previous, joins_next) {
            (false, true) => GroupPosition::First,
            (true, true) => GroupPosition::Middle,
            (true, false) => GroupPosition::Last,
            (false, false) => GroupPosition::None,
        };
    }
}
