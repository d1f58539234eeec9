/// Comparison functions for records and record arrays.
/// All comparison functions are allocation-free; the merge loops call them
/// once per output slot.
use std::cmp::Ordering;

use crate::common::{CtpError, Element, RecordArray, RecordBatch, Result};

/// Compare two records of equal width (no shape check).
///
/// Index 0 decides first; later indices only break ties. For equal-length
/// slices this is exactly slice `Ord`.
#[inline]
pub fn compare_rows<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    a.cmp(b)
}

/// Compare two records, rejecting records of different length.
pub fn compare_records<T: Ord>(a: &[T], b: &[T]) -> Result<Ordering> {
    if a.len() != b.len() {
        return Err(CtpError::ShapeMismatch {
            what: "record width",
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(compare_rows(a, b))
}

/// Compare two whole arrays row-major: row 0 first, within a row column 0
/// first. Both arrays must have the same shape.
pub fn compare_arrays<T: Element>(a: &RecordArray<T>, b: &RecordArray<T>) -> Result<Ordering> {
    check_same_shape(a, b)?;
    Ok(a.as_flat().cmp(b.as_flat()))
}

/// Exact equality of two arrays of the same shape.
pub fn arrays_equal<T: Element>(a: &RecordArray<T>, b: &RecordArray<T>) -> Result<bool> {
    check_same_shape(a, b)?;
    Ok(a.as_flat() == b.as_flat())
}

fn check_same_shape<T: Element>(a: &RecordArray<T>, b: &RecordArray<T>) -> Result<()> {
    if a.width() != b.width() {
        return Err(CtpError::ShapeMismatch {
            what: "array width",
            expected: a.width(),
            found: b.width(),
        });
    }
    if a.len() != b.len() {
        return Err(CtpError::ShapeMismatch {
            what: "array row count",
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// An indexable sequence of lexicographically ordered items.
///
/// Implemented by `RecordArray` (items are rows) and `RecordBatch` (items are
/// whole arrays, compared row-major). Sort and uniqueness routines are
/// written once against this trait. Callers of the batch impl must have
/// checked `uniform_shape` first; arrays of different shapes still compare
/// totally, just not meaningfully.
pub trait Lexicographic: Sync {
    fn item_count(&self) -> usize;

    fn compare_items(&self, i: usize, j: usize) -> Ordering;

    #[inline]
    fn items_equal(&self, i: usize, j: usize) -> bool {
        self.compare_items(i, j) == Ordering::Equal
    }
}

impl<T: Element> Lexicographic for RecordArray<T> {
    #[inline]
    fn item_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn compare_items(&self, i: usize, j: usize) -> Ordering {
        compare_rows(self.row(i), self.row(j))
    }

    #[inline]
    fn items_equal(&self, i: usize, j: usize) -> bool {
        self.row(i) == self.row(j)
    }
}

impl<T: Element> Lexicographic for RecordBatch<T> {
    #[inline]
    fn item_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn compare_items(&self, i: usize, j: usize) -> Ordering {
        let arrays = self.arrays();
        arrays[i].as_flat().cmp(arrays[j].as_flat())
    }

    #[inline]
    fn items_equal(&self, i: usize, j: usize) -> bool {
        let arrays = self.arrays();
        arrays[i].as_flat() == arrays[j].as_flat()
    }
}
