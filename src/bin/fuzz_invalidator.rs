//! AFL fuzz harness for the cache invalidator.
//!
//! Drives a source list and its cache with the same stream of updates and
//! checks, after every update, that:
//! 1. the cache is exactly as long as the list
//! 2. every value still in the cache equals what the factory would build
//!    from the current list (its own item plus both neighbors)
//!
//! Moves are applied with `MoveInvalidation::Around`, the only mode under
//! which (2) holds without the differ reporting extra changes.

use afl::fuzz;
use diffcache::{CacheInvalidator, DiffCache, InvalidationPolicy, ListUpdate, MoveInvalidation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Item {
    id: u32,
    rev: u32,
}

/// A value depending on the item and the identity of its neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Row {
    item: Item,
    prev: Option<u32>,
    next: Option<u32>,
}

fn render(items: &[Item], index: usize) -> Row {
    return Row {
        item: items[index],
        prev: index.checked_sub(1).map(|i| items[i].id),
        next: items.get(index + 1).map(|item| item.id),
    };
}

#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Change { pos_frac: u8, len: u8 },
    Move { from_frac: u8, to_frac: u8 },
    Insert { pos_frac: u8, len: u8 },
    Remove { pos_frac: u8, len: u8 },
    /// Read-through one position.
    Read { pos_frac: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.is_empty() {
            return None;
        }

        let op_type = bytes[0] % 5;
        let rest = &bytes[1..];

        match op_type {
            0 if rest.len() >= 2 => Some((FuzzOp::Change { pos_frac: rest[0], len: rest[1] % 4 + 1 }, &rest[2..])),
            1 if rest.len() >= 2 => Some((FuzzOp::Move { from_frac: rest[0], to_frac: rest[1] }, &rest[2..])),
            2 if rest.len() >= 2 => Some((FuzzOp::Insert { pos_frac: rest[0], len: rest[1] % 8 + 1 }, &rest[2..])),
            3 if rest.len() >= 2 => Some((FuzzOp::Remove { pos_frac: rest[0], len: rest[1] % 4 + 1 }, &rest[2..])),
            4 if !rest.is_empty() => Some((FuzzOp::Read { pos_frac: rest[0] }, &rest[1..])),
            _ => None,
        }
    }
}

/// Scale a byte to a position in `0..=len`.
fn scaled(frac: u8, len: usize) -> usize {
    return (frac as usize * (len + 1) / 256).min(len);
}

fn main() {
    let policy = InvalidationPolicy::new().with_moves(MoveInvalidation::Around);
    let invalidator = CacheInvalidator::new(policy);

    fuzz!(|data: &[u8]| {
        let mut items: Vec<Item> = Vec::new();
        let mut cache: DiffCache<Row> = DiffCache::new();
        let mut next_id = 0u32;
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            let len = items.len();

            let update = match op {
                FuzzOp::Change { pos_frac, len: count } => {
                    if len == 0 {
                        continue;
                    }
                    let position = scaled(pos_frac, len - 1);
                    let count = (count as usize).min(len - position);
                    for item in &mut items[position..position + count] {
                        item.rev += 1;
                    }
                    ListUpdate::Changed { position, count }
                }
                FuzzOp::Move { from_frac, to_frac } => {
                    if len == 0 {
                        continue;
                    }
                    let from = scaled(from_frac, len - 1);
                    let to = scaled(to_frac, len - 1);
                    let item = items.remove(from);
                    items.insert(to, item);
                    ListUpdate::Moved { from, to }
                }
                FuzzOp::Insert { pos_frac, len: count } => {
                    let position = scaled(pos_frac, len);
                    for offset in 0..count as usize {
                        items.insert(position + offset, Item { id: next_id, rev: 0 });
                        next_id += 1;
                    }
                    ListUpdate::Inserted { position, count: count as usize }
                }
                FuzzOp::Remove { pos_frac, len: count } => {
                    if len == 0 {
                        continue;
                    }
                    let position = scaled(pos_frac, len - 1);
                    let count = (count as usize).min(len - position);
                    items.drain(position..position + count);
                    ListUpdate::Removed { position, count }
                }
                FuzzOp::Read { pos_frac } => {
                    if len > 0 {
                        let position = scaled(pos_frac, len - 1);
                        cache.get_or_insert_with(position, || Some(render(&items, position)));
                    }
                    continue;
                }
            };

            invalidator.apply(&mut cache, &update);

            assert_eq!(cache.len(), items.len(), "length diverged after {update}");
            for (position, value) in cache.iter().enumerate() {
                if let Some(value) = value {
                    assert_eq!(*value, render(&items, position), "stale value at {position} after {update}");
                }
            }
        }
    });
}
