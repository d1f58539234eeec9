/// Stable lexicographic sorting of record arrays and record batches.
///
/// Every sort here is a bottom-up merge sort: runs of width 1, 2, 4, ... are
/// merged pairwise from one buffer into a single scratch buffer of the same
/// size, and the two buffers trade places after each pass. No recursion, one
/// allocation per call.
///
/// Within one array the passes run sequentially. Only `argsort_batch` merges
/// the disjoint block pairs of a pass in parallel, since comparing whole
/// arrays is expensive enough to pay for the fan-out.
use std::cmp::Ordering;
use std::mem;

use rayon::prelude::*;

use super::compare::Lexicographic;
use crate::common::{Element, Permutation, RecordArray, RecordBatch, Result};
use crate::permute::{apply_batch_inplace, invert};

/// Sort the rows of `array` ascending, in place. Equal rows keep their
/// relative order.
pub fn sort_inplace<T: Element>(array: &mut RecordArray<T>) {
    let n = array.len();
    if n < 2 {
        return;
    }
    let w = array.width();
    let data = array.flat_mut();
    let mut scratch = data.clone();

    let mut run = 1;
    while run < n {
        merge_row_pass(data, &mut scratch, w, run);
        mem::swap(data, &mut scratch);
        run *= 2;
    }
}

/// Merge every pair of adjacent `run`-row runs of `src` into `dst`.
fn merge_row_pass<T: Copy + Ord>(src: &[T], dst: &mut [T], w: usize, run: usize) {
    let block = 2 * run * w;
    for (src, dst) in src.chunks(block).zip(dst.chunks_mut(block)) {
        let rows = src.len() / w;
        let mid = run.min(rows);
        let (mut left, mut right) = (0, mid);
        for out in dst.chunks_exact_mut(w) {
            let take_left = left < mid
                && (right >= rows
                    || src[left * w..(left + 1) * w] <= src[right * w..(right + 1) * w]);
            let from = if take_left {
                left += 1;
                left - 1
            } else {
                right += 1;
                right - 1
            };
            out.copy_from_slice(&src[from * w..(from + 1) * w]);
        }
    }
}

/// Stable argsort: `order[k]` is the index of the k-th smallest item.
/// The input is not moved.
pub fn argsort<L: Lexicographic + ?Sized>(items: &L) -> Permutation {
    merge_sort_order(items, false)
}

/// Argsort the arrays of a batch as whole items (row-major, then column).
/// All arrays must share one shape. Block merges of each pass are spread
/// over the current rayon pool.
pub fn argsort_batch<T: Element>(batch: &RecordBatch<T>) -> Result<Permutation> {
    batch.uniform_shape()?;
    Ok(merge_sort_order(batch, true))
}

/// Reorder the arrays of a batch into ascending order, in place.
pub fn sort_batch_inplace<T: Element>(batch: &mut RecordBatch<T>) -> Result<()> {
    let order = argsort_batch(batch)?;
    let mut dest = invert(&order)?;
    apply_batch_inplace(batch, &mut dest)
}

pub(crate) fn merge_sort_order<L: Lexicographic + ?Sized>(
    items: &L,
    parallel: bool,
) -> Permutation {
    let n = items.item_count();
    let mut order: Permutation = (0..n).collect();
    if n < 2 {
        return order;
    }
    let mut scratch = vec![0usize; n];

    let mut run = 1;
    while run < n {
        let block = 2 * run;
        if parallel {
            order
                .par_chunks(block)
                .zip(scratch.par_chunks_mut(block))
                .for_each(|(src, dst)| merge_index_block(items, src, dst, run));
        } else {
            for (src, dst) in order.chunks(block).zip(scratch.chunks_mut(block)) {
                merge_index_block(items, src, dst, run);
            }
        }
        mem::swap(&mut order, &mut scratch);
        run *= 2;
    }
    order
}

#[inline]
fn merge_index_block<L: Lexicographic + ?Sized>(
    items: &L,
    src: &[usize],
    dst: &mut [usize],
    run: usize,
) {
    let end = src.len();
    let mid = run.min(end);
    let (mut left, mut right) = (0, mid);
    for slot in dst.iter_mut() {
        // Ties go left: that is what keeps the sort stable.
        let take_left = left < mid
            && (right >= end || items.compare_items(src[left], src[right]) != Ordering::Greater);
        if take_left {
            *slot = src[left];
            left += 1;
        } else {
            *slot = src[right];
            right += 1;
        }
    }
}
