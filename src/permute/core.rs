/// In-place row permutation by cycle-following swaps.
///
/// The destination map doubles as the scratch space for the walk: each swap
/// settles one row and records where the displaced row must go next, so no
/// row buffer is ever allocated. The map is consumed by the call.
use crate::common::{CtpError, Element, Permutation, RecordArray, RecordBatch, Result};

/// Invert an order (`order[k]` = source of output slot k) into a destination
/// map (`dest[i]` = output slot of source i). Rejects anything that is not a
/// dense bijection over `[0, n)`.
pub fn invert(order: &[usize]) -> Result<Permutation> {
    let n = order.len();
    let mut dest = vec![n; n];
    for (position, &source) in order.iter().enumerate() {
        if source >= n || dest[source] != n {
            return Err(CtpError::InvalidPermutation {
                position,
                value: source,
            });
        }
        dest[source] = position;
    }
    Ok(dest)
}

/// Move every row `i` of `array` to position `permutation[i]`.
///
/// `permutation` is used as scratch and holds no meaningful content
/// afterwards. On error the array may be partially permuted and must not be
/// reused.
pub fn apply_inplace<T: Element>(
    array: &mut RecordArray<T>,
    permutation: &mut [usize],
) -> Result<()> {
    if permutation.len() != array.len() {
        return Err(CtpError::ShapeMismatch {
            what: "permutation length",
            expected: array.len(),
            found: permutation.len(),
        });
    }
    walk_cycles(permutation, |i, j| array.swap_rows(i, j))
}

/// Materialize an argsort: row `order[k]` ends up at position k.
pub fn apply_order<T: Element>(array: &mut RecordArray<T>, order: &[usize]) -> Result<()> {
    let mut dest = invert(order)?;
    apply_inplace(array, &mut dest)
}

/// Batch analogue of `apply_inplace`: whole arrays change places.
pub fn apply_batch_inplace<T: Element>(
    batch: &mut RecordBatch<T>,
    permutation: &mut [usize],
) -> Result<()> {
    if permutation.len() != batch.len() {
        return Err(CtpError::ShapeMismatch {
            what: "permutation length",
            expected: batch.len(),
            found: permutation.len(),
        });
    }
    let arrays = batch.arrays_mut();
    walk_cycles(permutation, |i, j| arrays.swap(i, j))
}

/// Resolve position after position. While position `i` is open, its target
/// must lie in the still-unresolved range `(i, n)`; a cycle through `i` needs
/// at most `n - i - 1` swaps to close.
fn walk_cycles(permutation: &mut [usize], mut swap: impl FnMut(usize, usize)) -> Result<()> {
    let n = permutation.len();
    for i in 0..n {
        if permutation[i] == i {
            continue;
        }

        let mut closed = false;
        for _ in 0..n - i - 1 {
            let target = permutation[i];
            if target <= i || target >= n {
                return Err(CtpError::InvalidPermutation {
                    position: i,
                    value: target,
                });
            }
            swap(i, target);
            permutation.swap(i, target);
            if permutation[i] == i {
                closed = true;
                break;
            }
        }

        if !closed {
            return Err(CtpError::InvalidPermutation {
                position: i,
                value: permutation[i],
            });
        }
    }
    Ok(())
}
