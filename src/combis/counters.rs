/// Resumable combinatorial counters.
///
/// Each counter steps a small integer state in place and reports whether it
/// advanced (`true`) or wrapped back to its initial state (`false`). The
/// `fill_*` functions write consecutive states into a `RecordArray` of
/// bounded size and hand back the state to resume from, so very large
/// enumerations can be consumed chunk by chunk.
use crate::common::{CtpError, Element, RecordArray, Result, narrow};

/// One chunk of a resumable enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filled<T: Element> {
    /// The seed followed by the states generated from it.
    pub rows: RecordArray<T>,
    /// First state not yet emitted. Equals the initial state when `done`.
    pub next_seed: Vec<T>,
    /// The enumeration wrapped around while filling this chunk.
    pub done: bool,
}

// ========== Permutations ==========

/// Step `a` to its next distinct permutation in lexicographic order.
///
/// Repeated values only yield distinguishable orderings. The last
/// permutation (descending) wraps to the first (ascending) and returns
/// `false`.
pub fn next_permutation<T: Ord>(a: &mut [T]) -> bool {
    let n = a.len();
    if n < 2 {
        return false;
    }
    let Some(left) = (0..n - 1).rev().find(|&i| a[i] < a[i + 1]) else {
        a.reverse();
        return false;
    };
    let right = left + 1 + a[left + 1..].iter().rposition(|x| *x > a[left]).unwrap_or(0);
    a.swap(left, right);
    a[left + 1..].reverse();
    true
}

/// Up to `capacity` consecutive permutations starting at `seed`.
pub fn fill_permutations<T: Element>(seed: &[T], capacity: usize) -> Result<Filled<T>> {
    fill_chunk(seed.to_vec(), capacity, |a| Ok(next_permutation(a)), |v| Ok(v))
}

// ========== Subset indices ==========

/// Initial subset state over `n` elements: `[0, -1, -1, ...]`.
pub fn first_subset_indices(n: usize) -> Vec<i64> {
    let mut a = vec![-1; n];
    if let Some(first) = a.first_mut() {
        *first = 0;
    }
    a
}

/// Step to the next non-empty subset of `0..n`, `n = a.len()`.
///
/// A state lists the chosen indices in ascending order, padded with `-1`.
/// Subsets come out by size, then lexicographically. The full set wraps to
/// `[0, -1, ...]`. A state not of that form is InvalidArgument.
pub fn next_subset_indices(a: &mut [i64]) -> Result<bool> {
    let n = a.len() as i64;
    let malformed = || CtpError::InvalidArgument("malformed subset indices".to_string());
    if a.is_empty() || a[0] < 0 {
        return Err(malformed());
    }

    // Length of the non-negative prefix.
    let mut filled = a.len();
    for k in 1..a.len() {
        if a[k] < 0 {
            filled = k;
            break;
        }
        if a[k] >= n || a[k] <= a[k - 1] {
            return Err(malformed());
        }
    }
    if filled == a.len() {
        a.copy_from_slice(&first_subset_indices(a.len()));
        return Ok(false);
    }

    let mut max_val = n - 1;
    for i in (0..filled).rev() {
        if a[i] < max_val {
            a[i] += 1;
            for k in i + 1..filled {
                a[k] = a[k - 1] + 1;
            }
            return Ok(true);
        }
        if a[i] > max_val {
            return Err(malformed());
        }
        max_val -= 1;
    }

    // Every index is at its maximum: move on to subsets one larger.
    for (k, slot) in a[..=filled].iter_mut().enumerate() {
        *slot = k as i64;
    }
    Ok(true)
}

/// Up to `capacity` consecutive subset states starting at `seed`.
pub fn fill_subset_indices<T: Element>(seed: &[T], capacity: usize) -> Result<Filled<T>> {
    fill_counter(seed, capacity, next_subset_indices)
}

// ========== Winding numbers ==========

/// Counting rules for cogwheel winding numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindingRules {
    /// Number of scans; every winding number lies in `0..n_scans`.
    pub n_scans: i64,
    /// Keep the last winding number at zero.
    pub last_zero: bool,
    /// Skip the phase-inverted counterpart of every set.
    pub no_inverse: bool,
    /// Skip sets sharing a common factor with `n_scans`.
    pub no_scan_factor: bool,
    /// Skip sets whose winding numbers share a common factor.
    pub no_winding_factor: bool,
}

impl WindingRules {
    pub fn new(n_scans: i64) -> Self {
        WindingRules {
            n_scans,
            last_zero: false,
            no_inverse: false,
            no_scan_factor: false,
            no_winding_factor: false,
        }
    }
}

/// Initial winding state of length `len`: `[1, 0, 0, ...]`.
pub fn first_windings(len: usize) -> Vec<i64> {
    let mut w = vec![0; len];
    if let Some(first) = w.first_mut() {
        *first = 1;
    }
    w
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Plain little-endian count-up, honouring `last_zero` and `no_inverse`.
fn count_up_windings(w: &mut [i64], rules: &WindingRules) -> Result<bool> {
    let n_scans = rules.n_scans;
    if n_scans < 2 {
        return Err(CtpError::InvalidArgument(format!(
            "at least 2 scans are needed, got {}",
            n_scans
        )));
    }
    let blocks = if rules.last_zero {
        match w.last() {
            Some(0) => w.len() - 1,
            _ => {
                return Err(CtpError::InvalidArgument(
                    "last winding number must stay zero".to_string(),
                ));
            }
        }
    } else {
        w.len()
    };
    let out_of_range = |value: i64| {
        CtpError::InvalidArgument(format!("winding number {} is out of range", value))
    };

    // Positions from `split` on hold only 0 or the half-turn value and are
    // counted up to n_scans / 2 when inverses are skipped.
    let split = if rules.no_inverse {
        let half = (n_scans + 1) / 2;
        (0..blocks)
            .rev()
            .find(|&i| w[i] != 0 && w[i] != half)
            .unwrap_or(0)
    } else {
        blocks
    };

    for (i, slot) in w[..blocks].iter_mut().enumerate() {
        let top = if i < split { n_scans - 1 } else { n_scans / 2 };
        if *slot < top {
            *slot += 1;
            return Ok(true);
        }
        if *slot > top {
            return Err(out_of_range(*slot));
        }
        *slot = 0;
    }

    // Wrapped: every counted position is back at zero.
    if let Some(first) = w.first_mut() {
        *first = 1;
    }
    Ok(false)
}

/// Step to the next winding set accepted by `rules`.
pub fn next_windings(w: &mut [i64], rules: &WindingRules) -> Result<bool> {
    loop {
        if !count_up_windings(w, rules)? {
            return Ok(false);
        }
        let common = w.iter().fold(0, |acc, &x| gcd(acc, x));
        let accepted = if rules.no_winding_factor {
            common == 1
        } else if rules.no_scan_factor {
            gcd(common, rules.n_scans) == 1
        } else {
            true
        };
        if accepted {
            return Ok(true);
        }
    }
}

/// Up to `capacity` consecutive winding sets starting at `seed`.
pub fn fill_windings<T: Element>(
    seed: &[T],
    capacity: usize,
    rules: &WindingRules,
) -> Result<Filled<T>> {
    fill_counter(seed, capacity, |w| next_windings(w, rules))
}

// ========== Buffer filling ==========

fn fill_counter<T: Element>(
    seed: &[T],
    capacity: usize,
    step: impl FnMut(&mut [i64]) -> Result<bool>,
) -> Result<Filled<T>> {
    let working: Vec<i64> = seed.iter().map(|&v| v.into()).collect();
    fill_chunk(working, capacity, step, narrow)
}

/// Emit the seed, then step until the chunk holds `capacity` rows or the
/// counter wraps. A full chunk takes one extra step to find the resume point.
fn fill_chunk<S: Copy, T: Element>(
    mut working: Vec<S>,
    capacity: usize,
    mut step: impl FnMut(&mut [S]) -> Result<bool>,
    emit: impl Fn(S) -> Result<T>,
) -> Result<Filled<T>> {
    let width = working.len();
    if width == 0 {
        return Err(CtpError::InvalidArgument("the seed must not be empty".to_string()));
    }
    if capacity == 0 {
        return Err(CtpError::InvalidArgument(
            "a chunk must hold at least one row".to_string(),
        ));
    }
    let total = capacity.checked_mul(width).ok_or(CtpError::RowCountOverflow)?;
    let mut data = Vec::new();
    data.try_reserve_exact(total).map_err(|_| CtpError::RowCountOverflow)?;

    let push_row = |data: &mut Vec<T>, row: &[S]| -> Result<()> {
        for &v in row {
            data.push(emit(v)?);
        }
        Ok(())
    };

    push_row(&mut data, &working)?;
    let mut done = false;
    for _ in 1..capacity {
        if !step(&mut working)? {
            done = true;
            break;
        }
        push_row(&mut data, &working)?;
    }
    if !done {
        done = !step(&mut working)?;
    }

    Ok(Filled {
        rows: RecordArray::from_flat(width, data)?,
        next_seed: working.into_iter().map(&emit).collect::<Result<_>>()?,
        done,
    })
}
