//! Identity-preserving reorder of ordered collections.
//!
//! Drag gestures and keyboard moves resolve to one `(old_index, new_index)`
//! pair before reaching this module.

/// Moves the element at `old_index` to `new_index` in place.
///
/// Intermediate elements shift by one position; every other relative order is
/// preserved. Returns `false` without touching `items` when the indices are
/// equal or either one is out of bounds.
pub fn move_item<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) -> bool {
    let len = items.len();
    if old_index == new_index || old_index >= len || new_index >= len {
        return false;
    }
    let item = items.remove(old_index);
    items.insert(new_index, item);
    true
}

/// Returns a reordered copy of `items`, leaving the input untouched.
pub fn reorder<T: Clone>(items: &[T], old_index: usize, new_index: usize) -> Vec<T> {
    let mut reordered = items.to_vec();
    move_item(&mut reordered, old_index, new_index);
    reordered
}
