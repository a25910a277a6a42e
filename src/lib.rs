//! Diffcache - positional view-model caches kept consistent under list diffs.
//!
//! Rendering a long, frequently updated list (a chat timeline, a media
//! gallery) means turning every raw item into a view model, and the view
//! model of an item often depends on its neighbors too: whether the
//! previous message came from the same sender, whether the next one starts
//! a new day. Rebuilding everything on each update is wasteful; caching by
//! position goes stale as soon as items are inserted or removed.
//!
//! This crate keeps one optional cached value per list position and applies
//! the updates of a list diff to it, reshaping the slots and dropping
//! exactly the values that can no longer be trusted.
//!
//! # Quick Start
//!
//! ```
//! use diffcache::cache::DiffCache;
//! use diffcache::invalidator::CacheInvalidator;
//! use listdiff::ListUpdate;
//!
//! let mut cache: DiffCache<&str> = ["a", "b", "c", "d"].into_iter().map(Some).collect();
//! let invalidator = CacheInvalidator::default();
//!
//! // Two items removed from the middle: their old neighbors are dropped too.
//! invalidator.apply(&mut cache, &ListUpdate::Removed { position: 1, count: 2 });
//! assert_eq!(cache.len(), 2);
//! assert_eq!(cache.get(0), None);
//! assert_eq!(cache.get(1), None);
//! ```
//!
//! With a [`TimelinePresenter`](timeline::TimelinePresenter), diffing, invalidation and
//! lazy rebuilding happen together:
//!
//! ```
//! use diffcache::timeline::{factory_fn, Neighbors, TimelinePresenter};
//! use listdiff::Diffable;
//!
//! #[derive(Clone)]
//! struct Message {
//!     id: u64,
//!     text: String,
//! }
//!
//! impl Diffable for Message {
//!     fn same_item(&self, other: &Self) -> bool {
//!         self.id == other.id
//!     }
//!
//!     fn same_content(&self, other: &Self) -> bool {
//!         self.id == other.id && self.text == other.text
//!     }
//! }
//!
//! let mut presenter = TimelinePresenter::new(factory_fn(|window: Neighbors<'_, Message>| {
//!     Some(window.item().text.to_uppercase())
//! }));
//!
//! let view = presenter.replace_with(vec![
//!     Message { id: 1, text: "hello".into() },
//!     Message { id: 2, text: "world".into() },
//! ]);
//! assert_eq!(view, vec!["WORLD", "HELLO"]);
//! ```

pub mod cache;
pub mod error;
pub mod group;
pub mod invalidator;
pub mod policy;
pub mod stats;
pub mod timeline;

pub use cache::DiffCache;
pub use error::DiffError;
pub use group::GroupPosition;
pub use invalidator::CacheInvalidator;
pub use listdiff::{ListUpdate, ListUpdateCallback};
pub use policy::{InvalidationPolicy, MoveInvalidation, Neighborhood};
pub use stats::CacheStats;
pub use timeline::{factory_fn, ItemFactory, Neighbors, TimelinePresenter};
