/// Record storage for coherence transfer pathways.
///
/// A record is a fixed-length run of coherence orders, one per pulse block.
/// Records never live on their own: they are rows of a `RecordArray`, which
/// stores all of them in one contiguous row-major buffer so sorting and
/// permuting never allocate per row.
use std::fmt;
use std::ops::Index;

use super::error::{CtpError, Result, check_width};

/// Integer type usable as a coherence order.
///
/// The caller chooses the width; generators compute in `i64` and narrow to
/// the element type when rows are materialized.
pub trait Element:
    Copy + Ord + Send + Sync + fmt::Debug + TryFrom<i64> + Into<i64> + 'static
{
}

impl<T> Element for T where
    T: Copy + Ord + Send + Sync + fmt::Debug + TryFrom<i64> + Into<i64> + 'static
{
}

/// Narrow an `i64` to the element type.
#[inline]
pub fn narrow<T: Element>(value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| CtpError::ElementOverflow { value })
}

/// Index reordering of a record array's rows.
///
/// Two conventions are used across the crate. An *order* (what `argsort`
/// returns) lists source indices in output order. A *destination map* (what
/// `apply_inplace` consumes) gives, for every row, the position it moves to.
/// `permute::invert` converts one into the other.
pub type Permutation = Vec<usize>;

/// N records of identical width M, stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecordArray<T> {
    data: Vec<T>,
    width: usize,
}

impl<T: Element> RecordArray<T> {
    /// Empty array whose rows will have `width` elements.
    pub fn with_width(width: usize) -> Self {
        RecordArray {
            data: Vec::new(),
            width,
        }
    }

    /// Wrap a row-major buffer. `data.len()` must be a multiple of `width`;
    /// a zero width is only accepted for an empty buffer.
    pub fn from_flat(width: usize, data: Vec<T>) -> Result<Self> {
        if width == 0 {
            if !data.is_empty() {
                return Err(CtpError::ShapeMismatch {
                    what: "flat buffer length",
                    expected: 0,
                    found: data.len(),
                });
            }
        } else if data.len() % width != 0 {
            return Err(CtpError::ShapeMismatch {
                what: "flat buffer length",
                expected: data.len() - data.len() % width,
                found: data.len(),
            });
        }
        Ok(RecordArray { data, width })
    }

    /// Build from a list of rows. All rows must share the first row's width,
    /// which must not be zero. No rows at all gives an empty width-0 array.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut array = RecordArray {
            data: Vec::with_capacity(width * rows.len()),
            width,
        };
        for row in rows {
            array.push_row(row.as_ref())?;
        }
        Ok(array)
    }

    /// Append one record. Zero-width records cannot be stored: a flat
    /// buffer has no way to count them.
    pub fn push_row(&mut self, row: &[T]) -> Result<()> {
        check_width(self.width, row.len())?;
        if row.is_empty() {
            return Err(CtpError::ShapeMismatch {
                what: "record width",
                expected: 1,
                found: 0,
            });
        }
        self.data.extend_from_slice(row);
        Ok(())
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements per record.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// (rows, width)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width)
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width.max(1))
    }

    #[inline]
    pub fn as_flat(&self) -> &[T] {
        &self.data
    }

    pub fn into_flat(self) -> Vec<T> {
        self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// Swap two rows in place without a temporary row buffer.
    #[inline]
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let w = self.width;
        let (head, tail) = self.data.split_at_mut(hi * w);
        head[lo * w..(lo + 1) * w].swap_with_slice(&mut tail[..w]);
    }

    pub(crate) fn flat_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }
}

impl<T: Element> Index<usize> for RecordArray<T> {
    type Output = [T];

    #[inline]
    fn index(&self, i: usize) -> &[T] {
        self.row(i)
    }
}

impl<T: Element> fmt::Debug for RecordArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

/// Independent record arrays processed together as parallel lanes.
///
/// Arrays may differ in shape unless an operation says otherwise.
#[derive(Clone, PartialEq, Eq)]
pub struct RecordBatch<T> {
    arrays: Vec<RecordArray<T>>,
}

impl<T: Element> RecordBatch<T> {
    pub fn new(arrays: Vec<RecordArray<T>>) -> Self {
        RecordBatch { arrays }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    #[inline]
    pub fn arrays(&self) -> &[RecordArray<T>] {
        &self.arrays
    }

    #[inline]
    pub fn arrays_mut(&mut self) -> &mut [RecordArray<T>] {
        &mut self.arrays
    }

    pub fn push(&mut self, array: RecordArray<T>) {
        self.arrays.push(array);
    }

    pub fn into_inner(self) -> Vec<RecordArray<T>> {
        self.arrays
    }

    /// The shared (rows, width) of every array, or ShapeMismatch naming the
    /// first array that differs from array 0. An empty batch has shape (0, 0).
    pub fn uniform_shape(&self) -> Result<(usize, usize)> {
        let Some(first) = self.arrays.first() else {
            return Ok((0, 0));
        };
        let (rows, width) = first.shape();
        for array in &self.arrays[1..] {
            if array.width() != width {
                return Err(CtpError::ShapeMismatch {
                    what: "array width",
                    expected: width,
                    found: array.width(),
                });
            }
            if array.len() != rows {
                return Err(CtpError::ShapeMismatch {
                    what: "array row count",
                    expected: rows,
                    found: array.len(),
                });
            }
        }
        Ok((rows, width))
    }
}

impl<T> Default for RecordBatch<T> {
    fn default() -> Self {
        RecordBatch { arrays: Vec::new() }
    }
}

impl<T: Element> From<Vec<RecordArray<T>>> for RecordBatch<T> {
    fn from(arrays: Vec<RecordArray<T>>) -> Self {
        RecordBatch { arrays }
    }
}

impl<T: Element> Index<usize> for RecordBatch<T> {
    type Output = RecordArray<T>;

    #[inline]
    fn index(&self, i: usize) -> &RecordArray<T> {
        &self.arrays[i]
    }
}

impl<T: Element> fmt::Debug for RecordBatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.arrays).finish()
    }
}
