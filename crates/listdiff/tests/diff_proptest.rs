//! Property-based tests for the list differ.
//!
//! Replays the emitted updates on a model of the old list and checks that
//! the model ends up describing the new list.

use listdiff::{diff_slices, Diffable, ListUpdate};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Item {
    id: u8,
    rev: u8,
}

impl Diffable for Item {
    fn same_item(&self, other: &Self) -> bool {
        return self.id == other.id;
    }

    fn same_content(&self, other: &Self) -> bool {
        return self.id == other.id && self.rev == other.rev;
    }
}

/// A slot in the replayed list: where it came from, and whether it was
/// reported as changed since.
#[derive(Clone, Copy, Debug)]
enum Origin {
    Old { index: usize, changed: bool },
    Inserted,
}

fn replay(old_len: usize, updates: &[ListUpdate]) -> Vec<Origin> {
    let mut model: Vec<Origin> = (0..old_len).map(|index| Origin::Old { index, changed: false }).collect();
    for update in updates {
        assert!(update.fits(model.len()), "{update} does not fit a list of {}", model.len());
        match *update {
            ListUpdate::Changed { position, count } => {
                for slot in &mut model[position..position + count] {
                    if let Origin::Old { changed, .. } = slot {
                        *changed = true;
                    }
                }
            }
            ListUpdate::Moved { from, to } => {
                let slot = model.remove(from);
                model.insert(to, slot);
            }
            ListUpdate::Inserted { position, count } => {
                for _ in 0..count {
                    model.insert(position, Origin::Inserted);
                }
            }
            ListUpdate::Removed { position, count } => {
                model.drain(position..position + count);
            }
        }
    }
    return model;
}

/// Lists of unique ids, as timelines have.
fn arbitrary_list() -> impl Strategy<Value = Vec<Item>> {
    return prop::collection::vec((any::<u8>(), 0u8..3), 0..40).prop_map(|raw| {
        let mut seen = [false; 256];
        raw.into_iter()
            .filter(|(id, _)| !std::mem::replace(&mut seen[*id as usize], true))
            .map(|(id, rev)| Item { id, rev })
            .collect()
    });
}

/// A new list derived from `old` by dropping, revising and adding items.
fn edited(old: &[Item], keep: &[bool], bump: &[bool], extra: &[(u8, usize)]) -> Vec<Item> {
    let mut new: Vec<Item> = old
        .iter()
        .enumerate()
        .filter(|(i, _)| keep.get(*i).copied().unwrap_or(true))
        .map(|(i, item)| Item {
            id: item.id,
            rev: if bump.get(i).copied().unwrap_or(false) { item.rev + 1 } else { item.rev },
        })
        .collect();
    for &(id, at) in extra {
        if new.iter().any(|item| item.id == id) {
            continue;
        }
        let at = if new.is_empty() { 0 } else { at % (new.len() + 1) };
        new.insert(at, Item { id, rev: 0 });
    }
    return new;
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Replaying the updates on the old list yields the new list: surviving
    /// items line up with the same identity, and every content change is
    /// reported.
    #[test]
    fn updates_transform_old_into_new(
        old in arbitrary_list(),
        keep in prop::collection::vec(prop::bool::weighted(0.8), 40),
        bump in prop::collection::vec(prop::bool::weighted(0.2), 40),
        extra in prop::collection::vec((any::<u8>(), any::<usize>()), 0..10),
    ) {
        let new = edited(&old, &keep, &bump, &extra);
        let updates = diff_slices(&old, &new);
        let model = replay(old.len(), &updates);

        prop_assert_eq!(model.len(), new.len());
        for (position, slot) in model.iter().enumerate() {
            if let Origin::Old { index, changed } = *slot {
                prop_assert!(old[index].same_item(&new[position]));
                if !changed {
                    prop_assert!(old[index].same_content(&new[position]));
                }
            }
        }
    }

    /// Unrelated lists still produce a valid batch.
    #[test]
    fn arbitrary_pairs_replay_to_new_length(old in arbitrary_list(), new in arbitrary_list()) {
        let updates = diff_slices(&old, &new);
        let model = replay(old.len(), &updates);

        prop_assert_eq!(model.len(), new.len());
        for (position, slot) in model.iter().enumerate() {
            if let Origin::Old { index, .. } = *slot {
                prop_assert!(old[index].same_item(&new[position]));
            }
        }
    }

    /// Only surviving items are kept: nothing that exists in both lists is
    /// removed and re-inserted when its relative order is preserved.
    #[test]
    fn order_preserving_edits_keep_every_survivor(
        old in arbitrary_list(),
        keep in prop::collection::vec(prop::bool::weighted(0.7), 40),
    ) {
        let new = edited(&old, &keep, &[], &[]);
        let updates = diff_slices(&old, &new);
        let model = replay(old.len(), &updates);

        prop_assert!(
            model.iter().all(|slot| matches!(slot, Origin::Old { .. })),
            "a surviving item was removed and re-inserted"
        );
        prop_assert!(
            updates.iter().all(|update| matches!(update, ListUpdate::Removed { .. })),
            "expected only removals, got {:?}",
            updates
        );
    }
}
