//! Myers diff over two ordered snapshots.
//!
//! The differ answers "which items of the old list survive into the new
//! list" with a longest common subsequence by item identity, then walks the
//! matches from the end of the list toward the start and emits
//! [`ListUpdate`]s:
//!
//! - unmatched old items become `Removed`
//! - unmatched new items become `Inserted`
//! - matched items whose contents differ become `Changed`
//!
//! Walking backward keeps every emitted position valid in the current
//! coordinate space: an update only ever touches positions at or after the
//! point where the walk currently is, so everything before it still has its
//! old index. Moves are never emitted; a moved item shows up as a removal
//! plus an insertion.
//!
//! The search is Myers' greedy O((N+M)·D) algorithm on the region left over
//! after trimming the common prefix and suffix. It keeps one frontier per
//! edit distance for backtracking, so memory grows with D². Past
//! [`MAX_EDIT_DISTANCE`] the middle region is treated as replaced wholesale,
//! which is still a correct (just not minimal) diff.

use crate::update::{ListUpdate, ListUpdateCallback};

/// Largest edit distance searched before falling back to a full replace of
/// the untrimmed region. Items that survive inside that region are reported
/// as removed and re-inserted, so a cache fed by the fallback loses them.
pub const MAX_EDIT_DISTANCE: usize = 2048;

/// Identity and content comparison for list items.
pub trait Diffable {
    /// Whether `self` and `other` represent the same logical item
    /// (for example, the same event id).
    fn same_item(&self, other: &Self) -> bool;

    /// Whether the same item still renders identically.
    fn same_content(&self, other: &Self) -> bool {
        return self.same_item(other);
    }
}

/// Index-based view of the two snapshots being compared.
pub trait DiffCallback {
    fn old_len(&self) -> usize;
    fn new_len(&self) -> usize;
    fn are_items_the_same(&self, old: usize, new: usize) -> bool;
    fn are_contents_the_same(&self, old: usize, new: usize) -> bool;
}

/// [`DiffCallback`] over two slices of [`Diffable`] items.
pub struct SliceDiff<'a, T> {
    pub old: &'a [T],
    pub new: &'a [T],
}

impl<'a, T> SliceDiff<'a, T> {
    pub fn new(old: &'a [T], new: &'a [T]) -> SliceDiff<'a, T> {
        return SliceDiff { old, new };
    }
}

impl<T: Diffable> DiffCallback for SliceDiff<'_, T> {
    fn old_len(&self) -> usize {
        return self.old.len();
    }

    fn new_len(&self) -> usize {
        return self.new.len();
    }

    fn are_items_the_same(&self, old: usize, new: usize) -> bool {
        return self.old[old].same_item(&self.new[new]);
    }

    fn are_contents_the_same(&self, old: usize, new: usize) -> bool {
        return self.old[old].same_content(&self.new[new]);
    }
}

/// The outcome of [`calculate_diff`]: an ordered batch of updates that turns
/// the old snapshot into the new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffResult {
    updates: Vec<ListUpdate>,
    old_len: usize,
    new_len: usize,
}

impl DiffResult {
    /// The updates in dispatch order.
    pub fn updates(&self) -> &[ListUpdate] {
        return &self.updates;
    }

    pub fn into_updates(self) -> Vec<ListUpdate> {
        return self.updates;
    }

    pub fn old_len(&self) -> usize {
        return self.old_len;
    }

    pub fn new_len(&self) -> usize {
        return self.new_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.updates.is_empty();
    }

    /// Deliver every update, in order, to `callback`.
    pub fn dispatch_updates_to<C: ListUpdateCallback + ?Sized>(&self, callback: &mut C) {
        for update in &self.updates {
            update.dispatch(callback);
        }
    }
}

/// Diff two slices of [`Diffable`] items.
pub fn diff_slices<T: Diffable>(old: &[T], new: &[T]) -> Vec<ListUpdate> {
    return calculate_diff(&SliceDiff::new(old, new)).into_updates();
}

/// Compute the updates that turn the old snapshot of `callback` into the new
/// one.
pub fn calculate_diff<C: DiffCallback + ?Sized>(callback: &C) -> DiffResult {
    let old_len = callback.old_len();
    let new_len = callback.new_len();

    // Common prefix.
    let mut prefix = 0;
    while prefix < old_len && prefix < new_len && callback.are_items_the_same(prefix, prefix) {
        prefix += 1;
    }

    // Common suffix, not overlapping the prefix.
    let mut suffix = 0;
    while suffix < old_len - prefix
        && suffix < new_len - prefix
        && callback.are_items_the_same(old_len - 1 - suffix, new_len - 1 - suffix)
    {
        suffix += 1;
    }

    let mut matches: Vec<(usize, usize)> = (0..prefix).map(|i| (i, i)).collect();
    let middle = Region {
        old_start: prefix,
        old_end: old_len - suffix,
        new_start: prefix,
        new_end: new_len - suffix,
    };
    match_region(callback, middle, &mut matches);
    matches.extend((0..suffix).rev().map(|i| (old_len - 1 - i, new_len - 1 - i)));

    return DiffResult {
        updates: emit_updates(callback, &matches, old_len, new_len),
        old_len,
        new_len,
    };
}

// =============================================================================
// Matching
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct Region {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
}

/// Append the matched `(old, new)` pairs of `region`, in ascending order.
fn match_region<C: DiffCallback + ?Sized>(callback: &C, region: Region, matches: &mut Vec<(usize, usize)>) {
    let n = (region.old_end - region.old_start) as isize;
    let m = (region.new_end - region.new_start) as isize;
    if n == 0 || m == 0 {
        return;
    }

    let same = |x: isize, y: isize| {
        callback.are_items_the_same(region.old_start + x as usize, region.new_start + y as usize)
    };

    let max_d = (n + m).min(MAX_EDIT_DISTANCE as isize);
    let offset = n + m + 1;
    let mut v = vec![0isize; (2 * offset + 1) as usize];
    // Frontier after each completed round, for k in [-d, d].
    let mut trace: Vec<Vec<isize>> = Vec::new();
    let mut found = None;

    'search: for d in 0..=max_d {
        let mut k = -d;
        while k <= d {
            let down = k == -d || (k != d && v[(offset + k - 1) as usize] < v[(offset + k + 1) as usize]);
            let mut x = if down {
                v[(offset + k + 1) as usize]
            } else {
                v[(offset + k - 1) as usize] + 1
            };
            let mut y = x - k;
            while x < n && y < m && same(x, y) {
                x += 1;
                y += 1;
            }
            v[(offset + k) as usize] = x;
            if x >= n && y >= m {
                found = Some(d);
                break 'search;
            }
            k += 2;
        }
        trace.push(v[(offset - d) as usize..=(offset + d) as usize].to_vec());
    }

    let Some(distance) = found else {
        tracing::trace!(
            old = n,
            new = m,
            limit = MAX_EDIT_DISTANCE,
            "edit distance over limit, replacing region"
        );
        return;
    };

    let frontier = |d: isize, k: isize| trace[(d - 1) as usize][(k + d - 1) as usize];

    let mut region_matches: Vec<(usize, usize)> = Vec::new();
    let (mut x, mut y) = (n, m);
    let mut d = distance;
    while d > 0 {
        let k = x - y;
        let down = k == -d || (k != d && frontier(d, k - 1) < frontier(d, k + 1));
        let prev_k = if down { k + 1 } else { k - 1 };
        let prev_x = frontier(d, prev_k);
        let prev_y = prev_x - prev_k;
        let (mid_x, mid_y) = if down { (prev_x, prev_y + 1) } else { (prev_x + 1, prev_y) };
        while x > mid_x && y > mid_y {
            x -= 1;
            y -= 1;
            region_matches.push((x as usize, y as usize));
        }
        x = prev_x;
        y = prev_y;
        d -= 1;
    }
    while x > 0 && y > 0 {
        x -= 1;
        y -= 1;
        region_matches.push((x as usize, y as usize));
    }

    matches.extend(
        region_matches
            .into_iter()
            .rev()
            .map(|(x, y)| (region.old_start + x, region.new_start + y)),
    );
}

// =============================================================================
// Emission
// =============================================================================

/// Walk `matches` from the end and emit updates in current coordinates.
fn emit_updates<C: DiffCallback + ?Sized>(
    callback: &C,
    matches: &[(usize, usize)],
    old_len: usize,
    new_len: usize,
) -> Vec<ListUpdate> {
    let mut updates = Vec::new();
    let mut pos_old = old_len;
    let mut pos_new = new_len;
    // Pending run of changed positions [lo, hi), extended leftward.
    let mut changed: Option<(usize, usize)> = None;

    for &(x, y) in matches.iter().rev() {
        if x + 1 < pos_old || y + 1 < pos_new {
            flush_changed(&mut changed, &mut updates);
            emit_gap(&mut updates, x + 1, pos_old, y + 1, pos_new);
        }
        if !callback.are_contents_the_same(x, y) {
            match changed {
                Some((lo, hi)) if lo == x + 1 => changed = Some((x, hi)),
                _ => {
                    flush_changed(&mut changed, &mut updates);
                    changed = Some((x, x + 1));
                }
            }
        } else {
            flush_changed(&mut changed, &mut updates);
        }
        pos_old = x;
        pos_new = y;
    }
    flush_changed(&mut changed, &mut updates);
    emit_gap(&mut updates, 0, pos_old, 0, pos_new);

    return updates;
}

fn flush_changed(changed: &mut Option<(usize, usize)>, updates: &mut Vec<ListUpdate>) {
    if let Some((lo, hi)) = changed.take() {
        updates.push(ListUpdate::Changed { position: lo, count: hi - lo });
    }
}

/// Old items `[old_start, old_end)` are replaced by `new_end - new_start`
/// new items at the same position.
fn emit_gap(updates: &mut Vec<ListUpdate>, old_start: usize, old_end: usize, new_start: usize, new_end: usize) {
    if old_end > old_start {
        updates.push(ListUpdate::Removed { position: old_start, count: old_end - old_start });
    }
    if new_end > new_start {
        updates.push(ListUpdate::Inserted { position: old_start, count: new_end - new_start });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Item {
        id: u32,
        body: &'static str,
    }

    impl Diffable for Item {
        fn same_item(&self, other: &Self) -> bool {
            return self.id == other.id;
        }

        fn same_content(&self, other: &Self) -> bool {
            return self.id == other.id && self.body == other.body;
        }
    }

    fn items(ids: &[u32]) -> Vec<Item> {
        return ids.iter().map(|&id| Item { id, body: "" }).collect();
    }

    #[test]
    fn identical_lists_produce_nothing() {
        let list = items(&[1, 2, 3]);
        assert!(diff_slices(&list, &list).is_empty());
    }

    #[test]
    fn empty_to_full_is_single_insert() {
        let updates = diff_slices(&items(&[]), &items(&[1, 2, 3]));
        assert_eq!(updates, vec![ListUpdate::Inserted { position: 0, count: 3 }]);
    }

    #[test]
    fn full_to_empty_is_single_remove() {
        let updates = diff_slices(&items(&[1, 2, 3]), &items(&[]));
        assert_eq!(updates, vec![ListUpdate::Removed { position: 0, count: 3 }]);
    }

    #[test]
    fn append_at_end() {
        let updates = diff_slices(&items(&[1, 2]), &items(&[1, 2, 3, 4]));
        assert_eq!(updates, vec![ListUpdate::Inserted { position: 2, count: 2 }]);
    }

    #[test]
    fn prepend_at_start() {
        let updates = diff_slices(&items(&[3, 4]), &items(&[1, 2, 3, 4]));
        assert_eq!(updates, vec![ListUpdate::Inserted { position: 0, count: 2 }]);
    }

    #[test]
    fn remove_from_middle() {
        let updates = diff_slices(&items(&[1, 2, 3, 4]), &items(&[1, 4]));
        assert_eq!(updates, vec![ListUpdate::Removed { position: 1, count: 2 }]);
    }

    #[test]
    fn replace_in_middle_removes_then_inserts() {
        let updates = diff_slices(&items(&[1, 2, 3]), &items(&[1, 9, 3]));
        assert_eq!(
            updates,
            vec![
                ListUpdate::Removed { position: 1, count: 1 },
                ListUpdate::Inserted { position: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn content_changes_are_coalesced() {
        let old = vec![
            Item { id: 1, body: "a" },
            Item { id: 2, body: "b" },
            Item { id: 3, body: "c" },
            Item { id: 4, body: "d" },
        ];
        let new = vec![
            Item { id: 1, body: "a" },
            Item { id: 2, body: "B" },
            Item { id: 3, body: "C" },
            Item { id: 4, body: "d" },
        ];
        assert_eq!(diff_slices(&old, &new), vec![ListUpdate::Changed { position: 1, count: 2 }]);
    }

    #[test]
    fn changes_on_both_sides_of_an_insert_use_current_positions() {
        let old = vec![Item { id: 1, body: "a" }, Item { id: 3, body: "c" }];
        let new = vec![
            Item { id: 1, body: "A" },
            Item { id: 2, body: "b" },
            Item { id: 3, body: "C" },
        ];
        assert_eq!(
            diff_slices(&old, &new),
            vec![
                ListUpdate::Changed { position: 1, count: 1 },
                ListUpdate::Inserted { position: 1, count: 1 },
                ListUpdate::Changed { position: 0, count: 1 },
            ]
        );
    }

    #[test]
    fn moved_item_is_remove_plus_insert() {
        let updates = diff_slices(&items(&[1, 2, 3]), &items(&[2, 3, 1]));
        let mut len = 3usize;
        for update in &updates {
            assert!(!matches!(update, ListUpdate::Moved { .. }));
            len = update.apply_len(len).unwrap();
        }
        assert_eq!(len, 3);
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn distance_over_limit_replaces_the_untrimmed_region() {
        // Every other item replaced: D = 5000, well past the limit.
        let old: Vec<u32> = (0..5000).collect();
        let new: Vec<u32> = (0..5000).map(|i| if i % 2 == 0 { i } else { 10_000 + i }).collect();
        let updates = diff_slices(&items(&old), &items(&new));

        // Only the common prefix (item 0) survives.
        assert_eq!(
            updates,
            vec![
                ListUpdate::Removed { position: 1, count: 4999 },
                ListUpdate::Inserted { position: 1, count: 4999 },
            ]
        );

        // Replaying still yields a list of the new length whose surviving
        // slot holds the same item.
        let mut model: Vec<Option<u32>> = old.iter().copied().map(Some).collect();
        for update in &updates {
            match *update {
                ListUpdate::Removed { position, count } => {
                    model.drain(position..position + count);
                }
                ListUpdate::Inserted { position, count } => {
                    for offset in 0..count {
                        model.insert(position + offset, None);
                    }
                }
                _ => panic!("unexpected {update}"),
            }
        }
        assert_eq!(model.len(), new.len());
        assert_eq!(model[0], Some(new[0]));
    }

    #[test]
    fn distance_at_small_sizes_stays_minimal() {
        let old: Vec<u32> = (0..200).collect();
        let new: Vec<u32> = (0..200).map(|i| if i % 2 == 0 { i } else { 10_000 + i }).collect();
        let updates = diff_slices(&items(&old), &items(&new));
        let removed: usize = updates
            .iter()
            .map(|update| match *update {
                ListUpdate::Removed { count, .. } => count,
                _ => 0,
            })
            .sum();
        assert_eq!(removed, 100);
    }

    #[test]
    fn result_reports_lengths_and_dispatches() {
        let old = items(&[1, 2, 3]);
        let new = items(&[0, 1, 3]);
        let result = calculate_diff(&SliceDiff::new(&old, &new));
        assert_eq!(result.old_len(), 3);
        assert_eq!(result.new_len(), 3);

        let mut recorded: Vec<ListUpdate> = Vec::new();
        result.dispatch_updates_to(&mut recorded);
        assert_eq!(recorded, result.updates());
    }
}
