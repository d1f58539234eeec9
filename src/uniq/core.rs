/// Duplicate detection for record arrays and record batches.
///
/// Two families with different contracts live here and both stay callable:
/// - unordered checks (`all_rows_unique`) that scan every pair and need no
///   precondition;
/// - sort-based checks (`unique_indices`, `mark_duplicates`) that argsort
///   first and then only look at neighbours.
///
/// Masks are always indexed by the caller's original row order.
use rayon::prelude::*;

use crate::common::{Element, RecordArray, RecordBatch};
use crate::sort::{Lexicographic, argsort};

/// True when no two rows of `array` are equal. O(N^2) pairwise scan; the
/// input may be in any order.
pub fn all_rows_unique<T: Element>(array: &RecordArray<T>) -> bool {
    let n = array.len();
    for i in 0..n {
        let a = array.row(i);
        for j in i + 1..n {
            if a == array.row(j) {
                return false;
            }
        }
    }
    true
}

/// `all_rows_unique` for every array of a batch, one lane per array, on the
/// current rayon pool.
pub fn unique_row_mask<T: Element>(batch: &RecordBatch<T>) -> Vec<bool> {
    batch.arrays().par_iter().map(all_rows_unique).collect()
}

/// Ascending order with ties allowed.
pub fn is_sorted<L: Lexicographic + ?Sized>(items: &L) -> bool {
    (1..items.item_count()).all(|i| items.compare_items(i - 1, i).is_le())
}

/// Strictly ascending order: sorted and free of adjacent duplicates, checked
/// in one forward pass.
pub fn is_sorted_unique<L: Lexicographic + ?Sized>(items: &L) -> bool {
    (1..items.item_count()).all(|i| items.compare_items(i - 1, i).is_lt())
}

/// Alias kept under the name the pathway tooling uses for the combined
/// sortedness and distinctness check.
#[inline]
pub fn sorted_uniqueness_check<L: Lexicographic + ?Sized>(items: &L) -> bool {
    is_sorted_unique(items)
}

/// Index of the first (in sorted order, stable) occurrence of each distinct
/// item, listed in ascending item order. Every distinct value is represented.
pub fn unique_indices<L: Lexicographic + ?Sized>(items: &L) -> Vec<usize> {
    let order = argsort(items);
    let Some(&first) = order.first() else {
        return Vec::new();
    };

    let mut indices = Vec::with_capacity(order.len());
    indices.push(first);
    let mut pivot = first;
    for &idx in &order[1..] {
        if !items.items_equal(pivot, idx) {
            indices.push(idx);
            pivot = idx;
        }
    }
    indices
}

/// Per-item uniqueness mask. Every member of a group of two or more equal
/// items is marked `false`, not just the later occurrences.
pub fn mark_duplicates<L: Lexicographic + ?Sized>(items: &L) -> Vec<bool> {
    let order = argsort(items);
    let mut is_unique = vec![true; order.len()];
    for pair in order.windows(2) {
        if items.items_equal(pair[0], pair[1]) {
            is_unique[pair[0]] = false;
            is_unique[pair[1]] = false;
        }
    }
    is_unique
}
