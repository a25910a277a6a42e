//! Ordered list diffing.
//!
//! Compares two snapshots of an ordered list and describes the difference as
//! a batch of positional [`ListUpdate`]s (changed, moved, inserted, removed),
//! delivered in an order where every position refers to the list as it looks
//! after the previous updates were applied.
//!
//! # Example
//!
//! ```
//! use listdiff::{diff_slices, Diffable, ListUpdate};
//!
//! #[derive(Clone)]
//! struct Event {
//!     id: u32,
//!     body: &'static str,
//! }
//!
//! impl Diffable for Event {
//!     fn same_item(&self, other: &Self) -> bool {
//!         self.id == other.id
//!     }
//!
//!     fn same_content(&self, other: &Self) -> bool {
//!         self.id == other.id && self.body == other.body
//!     }
//! }
//!
//! let old = vec![Event { id: 1, body: "hi" }, Event { id: 2, body: "yo" }];
//! let new = vec![
//!     Event { id: 1, body: "hi" },
//!     Event { id: 2, body: "yo (edited)" },
//!     Event { id: 3, body: "new" },
//! ];
//!
//! let updates = diff_slices(&old, &new);
//! assert_eq!(
//!     updates,
//!     vec![
//!         ListUpdate::Inserted { position: 2, count: 1 },
//!         ListUpdate::Changed { position: 1, count: 1 },
//!     ]
//! );
//! ```

pub mod myers;
pub mod update;

pub use myers::{calculate_diff, diff_slices, DiffCallback, DiffResult, Diffable, SliceDiff, MAX_EDIT_DISTANCE};
pub use update::{ListUpdate, ListUpdateCallback};
