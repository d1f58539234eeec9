/// Data-parallel dispatch over the independent arrays of a `RecordBatch`.
///
/// Each lane owns one array (or one slot of the output) for the whole call.
/// Lanes never talk to each other; results are joined when the call returns.
/// Operations that can fail per lane return one `Result` per lane, so a bad
/// lane never hides or blocks the outcome of its siblings.
use rayon::prelude::*;
use tracing::debug_span;

use crate::common::{CtpError, Element, Permutation, RecordArray, RecordBatch, Result};
use crate::permute::{apply_batch_inplace, apply_inplace, invert};
use crate::select::select_front;
use crate::sort::{argsort, merge_sort_order, sort_inplace};
use crate::uniq::{all_rows_unique, is_sorted, is_sorted_unique, mark_duplicates, unique_indices};

/// Configuration for batch dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Size of a private worker pool. `None` runs on rayon's global pool.
    pub threads: Option<usize>,
    /// Batches with fewer lanes than this run sequentially on the caller's
    /// thread.
    pub min_parallel_lanes: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            threads: None,
            min_parallel_lanes: 2,
        }
    }
}

/// Runs per-array operations across a batch, one lane per array.
pub struct BatchCoordinator {
    pool: Option<rayon::ThreadPool>,
    min_parallel_lanes: usize,
}

impl BatchCoordinator {
    /// Build a coordinator. A private pool is created when `config.threads`
    /// is set; the global pool is never reconfigured.
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let pool = match config.threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n.max(1))
                    .thread_name(|i| format!("fctp-lane-{}", i))
                    .build()?,
            ),
            None => None,
        };
        Ok(BatchCoordinator {
            pool,
            min_parallel_lanes: config.min_parallel_lanes,
        })
    }

    /// Number of worker threads lanes are spread over.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    #[inline]
    fn fans_out(&self, lanes: usize) -> bool {
        lanes >= self.min_parallel_lanes.max(2)
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Map `f` over the arrays of `batch`, one lane each, results in batch order.
    pub fn map_lanes<T, R, F>(&self, batch: &RecordBatch<T>, f: F) -> Vec<R>
    where
        T: Element,
        R: Send,
        F: Fn(&RecordArray<T>) -> R + Sync + Send,
    {
        let arrays = batch.arrays();
        if self.fans_out(arrays.len()) {
            self.install(|| arrays.par_iter().map(&f).collect())
        } else {
            arrays.iter().map(&f).collect()
        }
    }

    /// Like `map_lanes`, with exclusive access to each lane's array.
    pub fn map_lanes_mut<T, R, F>(&self, batch: &mut RecordBatch<T>, f: F) -> Vec<R>
    where
        T: Element,
        R: Send,
        F: Fn(usize, &mut RecordArray<T>) -> R + Sync + Send,
    {
        let arrays = batch.arrays_mut();
        if self.fans_out(arrays.len()) {
            self.install(|| {
                arrays
                    .par_iter_mut()
                    .enumerate()
                    .map(|(i, a)| f(i, a))
                    .collect()
            })
        } else {
            arrays.iter_mut().enumerate().map(|(i, a)| f(i, a)).collect()
        }
    }

    /// Sort the rows of every array in place.
    pub fn sort_each<T: Element>(&self, batch: &mut RecordBatch<T>) {
        let _span = debug_span!("sort_each", lanes = batch.len()).entered();
        self.map_lanes_mut(batch, |_, array| sort_inplace(array));
    }

    /// Stable argsort of the rows of every array.
    pub fn argsort_each<T: Element>(&self, batch: &RecordBatch<T>) -> Vec<Permutation> {
        let _span = debug_span!("argsort_each", lanes = batch.len()).entered();
        self.map_lanes(batch, |array| argsort(array))
    }

    /// Per-array "no duplicate rows" flags.
    pub fn unique_row_mask<T: Element>(&self, batch: &RecordBatch<T>) -> Vec<bool> {
        let _span = debug_span!("unique_row_mask", lanes = batch.len()).entered();
        self.map_lanes(batch, |array| all_rows_unique(array))
    }

    /// Apply one destination map per lane. Each lane reports its own outcome;
    /// a lane whose map is invalid is left in an unspecified state while the
    /// others complete normally.
    ///
    /// A map count different from the lane count fails the whole call before
    /// any lane runs.
    pub fn apply_each<T: Element>(
        &self,
        batch: &mut RecordBatch<T>,
        mut permutations: Vec<Permutation>,
    ) -> Result<Vec<Result<()>>> {
        let _span = debug_span!("apply_each", lanes = batch.len()).entered();
        let lanes = batch.len();
        if permutations.len() != lanes {
            return Err(CtpError::ShapeMismatch {
                what: "permutation count",
                expected: lanes,
                found: permutations.len(),
            });
        }

        let arrays = batch.arrays_mut();
        let run = |(array, perm): (&mut RecordArray<T>, &mut Permutation)| {
            let outcome = apply_inplace(array, perm);
            if let Err(e) = &outcome {
                tracing::debug!(error = %e, "lane failed to apply permutation");
            }
            outcome
        };
        if self.fans_out(lanes) {
            Ok(self.install(|| {
                arrays
                    .par_iter_mut()
                    .zip(permutations.par_iter_mut())
                    .map(run)
                    .collect()
            }))
        } else {
            Ok(arrays.iter_mut().zip(permutations.iter_mut()).map(run).collect())
        }
    }

    /// `select_front` per lane against a wanted set per lane. The wanted
    /// sets must match the lanes one to one.
    pub fn select_front_each<T: Element>(
        &self,
        batch: &RecordBatch<T>,
        wanted: &[RecordArray<T>],
    ) -> Result<Vec<Result<RecordArray<T>>>> {
        let _span = debug_span!("select_front_each", lanes = batch.len()).entered();
        let arrays = batch.arrays();
        if wanted.len() != arrays.len() {
            return Err(CtpError::ShapeMismatch {
                what: "wanted set count",
                expected: arrays.len(),
                found: wanted.len(),
            });
        }
        let run = |(full, want): (&RecordArray<T>, &RecordArray<T>)| select_front(full, want);
        if self.fans_out(arrays.len()) {
            Ok(self.install(|| arrays.par_iter().zip(wanted.par_iter()).map(run).collect()))
        } else {
            Ok(arrays.iter().zip(wanted.iter()).map(run).collect())
        }
    }

    /// Stable argsort of the batch's arrays as whole items. All arrays must
    /// share one shape.
    pub fn argsort_batch<T: Element>(&self, batch: &RecordBatch<T>) -> Result<Permutation> {
        let _span = debug_span!("argsort_batch", lanes = batch.len()).entered();
        batch.uniform_shape()?;
        if self.fans_out(batch.len()) {
            Ok(self.install(|| merge_sort_order(batch, true)))
        } else {
            Ok(merge_sort_order(batch, false))
        }
    }

    /// Put the batch's arrays into ascending order, in place.
    pub fn sort_batch<T: Element>(&self, batch: &mut RecordBatch<T>) -> Result<()> {
        let order = self.argsort_batch(batch)?;
        let mut dest = invert(&order)?;
        apply_batch_inplace(batch, &mut dest)
    }

    /// Per-array flag: no other array of the batch is identical to it.
    pub fn mark_duplicate_arrays<T: Element>(&self, batch: &RecordBatch<T>) -> Result<Vec<bool>> {
        batch.uniform_shape()?;
        Ok(mark_duplicates(batch))
    }

    /// First index of each distinct array, in ascending array order.
    pub fn unique_array_indices<T: Element>(&self, batch: &RecordBatch<T>) -> Result<Vec<usize>> {
        batch.uniform_shape()?;
        Ok(unique_indices(batch))
    }

    /// Whether the arrays are in ascending order (ties allowed).
    pub fn is_batch_sorted<T: Element>(&self, batch: &RecordBatch<T>) -> Result<bool> {
        batch.uniform_shape()?;
        Ok(is_sorted(batch))
    }

    /// Whether the arrays are strictly ascending.
    pub fn is_batch_sorted_unique<T: Element>(&self, batch: &RecordBatch<T>) -> Result<bool> {
        batch.uniform_shape()?;
        Ok(is_sorted_unique(batch))
    }
}
