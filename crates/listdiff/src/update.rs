//! Positional list-update operations.
//!
//! A diff between two snapshots of an ordered list is delivered as a sequence
//! of [`ListUpdate`]s. Every position is expressed in the *current* coordinate
//! space: the list as it looks after all previously delivered updates have
//! been applied. Consumers either match on the enum or implement
//! [`ListUpdateCallback`] and let [`ListUpdate::dispatch`] route the calls.

use std::fmt;

/// One edit primitive against the current state of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListUpdate {
    /// `count` contiguous items starting at `position` were updated in place.
    Changed { position: usize, count: usize },
    /// A single item moved from `from` to `to`. Length is unchanged.
    Moved { from: usize, to: usize },
    /// `count` new items were inserted starting at `position`.
    Inserted { position: usize, count: usize },
    /// `count` items were removed starting at `position`.
    Removed { position: usize, count: usize },
}

impl ListUpdate {
    /// How much this update changes the length of the list.
    pub fn len_delta(&self) -> isize {
        return match *self {
            ListUpdate::Changed { .. } | ListUpdate::Moved { .. } => 0,
            ListUpdate::Inserted { count, .. } => count as isize,
            ListUpdate::Removed { count, .. } => -(count as isize),
        };
    }

    /// The length of a list of `len` items after this update, or `None` if
    /// the update does not fit inside such a list.
    pub fn apply_len(&self, len: usize) -> Option<usize> {
        return match *self {
            ListUpdate::Changed { position, count } => {
                let end = position.checked_add(count)?;
                (end <= len).then_some(len)
            }
            ListUpdate::Moved { from, to } => (from < len && to < len).then_some(len),
            ListUpdate::Inserted { position, count } => {
                if position > len {
                    return None;
                }
                len.checked_add(count)
            }
            ListUpdate::Removed { position, count } => {
                let end = position.checked_add(count)?;
                (end <= len).then(|| len - count)
            }
        };
    }

    /// Check whether this update fits inside a list of `len` items.
    pub fn fits(&self, len: usize) -> bool {
        return self.apply_len(len).is_some();
    }

    /// Route this update to the matching callback method.
    pub fn dispatch<C: ListUpdateCallback + ?Sized>(&self, callback: &mut C) {
        match *self {
            ListUpdate::Changed { position, count } => callback.on_changed(position, count),
            ListUpdate::Moved { from, to } => callback.on_moved(from, to),
            ListUpdate::Inserted { position, count } => callback.on_inserted(position, count),
            ListUpdate::Removed { position, count } => callback.on_removed(position, count),
        }
    }
}

impl fmt::Display for ListUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match *self {
            ListUpdate::Changed { position, count } => write!(f, "changed({position}, {count})"),
            ListUpdate::Moved { from, to } => write!(f, "moved({from} -> {to})"),
            ListUpdate::Inserted { position, count } => write!(f, "inserted({position}, {count})"),
            ListUpdate::Removed { position, count } => write!(f, "removed({position}, {count})"),
        };
    }
}

/// Receiver of list updates, one method per edit primitive.
///
/// Calls arrive in the order the differ emits them, positions in the current
/// coordinate space.
pub trait ListUpdateCallback {
    fn on_changed(&mut self, position: usize, count: usize);
    fn on_moved(&mut self, from: usize, to: usize);
    fn on_inserted(&mut self, position: usize, count: usize);
    fn on_removed(&mut self, position: usize, count: usize);
}

/// Records every call as a [`ListUpdate`].
impl ListUpdateCallback for Vec<ListUpdate> {
    fn on_changed(&mut self, position: usize, count: usize) {
        self.push(ListUpdate::Changed { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.push(ListUpdate::Moved { from, to });
    }

    fn on_inserted(&mut self, position: usize, count: usize) {
        self.push(ListUpdate::Inserted { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.push(ListUpdate::Removed { position, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_after_each_kind() {
        assert_eq!(ListUpdate::Changed { position: 1, count: 2 }.apply_len(3), Some(3));
        assert_eq!(ListUpdate::Moved { from: 0, to: 2 }.apply_len(3), Some(3));
        assert_eq!(ListUpdate::Inserted { position: 3, count: 2 }.apply_len(3), Some(5));
        assert_eq!(ListUpdate::Removed { position: 1, count: 2 }.apply_len(3), Some(1));
    }

    #[test]
    fn out_of_bounds_updates_do_not_fit() {
        assert!(!ListUpdate::Changed { position: 2, count: 2 }.fits(3));
        assert!(!ListUpdate::Moved { from: 3, to: 0 }.fits(3));
        assert!(!ListUpdate::Moved { from: 0, to: 3 }.fits(3));
        assert!(!ListUpdate::Inserted { position: 4, count: 1 }.fits(3));
        assert!(!ListUpdate::Removed { position: 0, count: 4 }.fits(3));
        assert!(!ListUpdate::Changed { position: usize::MAX, count: 2 }.fits(3));
    }

    #[test]
    fn zero_count_updates_are_noops() {
        assert_eq!(ListUpdate::Inserted { position: 0, count: 0 }.apply_len(0), Some(0));
        assert_eq!(ListUpdate::Removed { position: 3, count: 0 }.apply_len(3), Some(3));
        assert_eq!(ListUpdate::Changed { position: 3, count: 0 }.apply_len(3), Some(3));
    }

    #[test]
    fn dispatch_records_into_vec() {
        let updates = [
            ListUpdate::Removed { position: 4, count: 1 },
            ListUpdate::Inserted { position: 2, count: 3 },
            ListUpdate::Changed { position: 0, count: 1 },
            ListUpdate::Moved { from: 1, to: 0 },
        ];
        let mut recorded: Vec<ListUpdate> = Vec::new();
        for update in &updates {
            update.dispatch(&mut recorded);
        }
        assert_eq!(recorded, updates);
    }

    #[test]
    fn display() {
        assert_eq!(ListUpdate::Moved { from: 1, to: 4 }.to_string(), "moved(1 -> 4)");
        assert_eq!(ListUpdate::Inserted { position: 0, count: 2 }.to_string(), "inserted(0, 2)");
    }
}
