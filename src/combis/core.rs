/// Cartesian-product generation of candidate pathways.
///
/// Enumeration order is part of the contract: rows come out row-major with
/// the last step varying fastest, so row `r` of the product of lists
/// `L0, L1, ..., Lk` picks `Lj[(r / stride_j) % len_j]` where `stride_j` is the
/// product of the lengths after `j`. Downstream code relies on this order.
use crate::common::{CtpError, Element, RecordArray, Result, narrow};

/// Candidate values for one step of a pathway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates<T> {
    /// Exactly one value.
    Value(T),
    /// Explicit values, enumerated in the given order.
    List(Vec<T>),
    /// Every integer from `+b` down to `-b`.
    Symmetric(T),
}

impl<T: Element> Candidates<T> {
    /// Materialize the candidate values in enumeration order.
    pub fn values(&self) -> Result<Vec<T>> {
        match self {
            Candidates::Value(v) => Ok(vec![*v]),
            Candidates::List(v) => Ok(v.clone()),
            Candidates::Symmetric(b) => symmetric_range(*b),
        }
    }
}

/// `+b, b-1, ..., -b`
fn symmetric_range<T: Element>(bound: T) -> Result<Vec<T>> {
    let b: i64 = bound.into();
    if b < 0 {
        return Err(CtpError::InvalidArgument(format!(
            "coherence bound must be non-negative, got {}",
            b
        )));
    }
    (-b..=b).rev().map(narrow).collect()
}

/// Bound on the coherence order of the interior steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepBound<T> {
    /// One bound for every interior step.
    Shared(T),
    /// One bound per interior step, in step order.
    PerStep(Vec<T>),
}

/// Coherence order(s) allowed at the first or last step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<T> {
    Fixed(T),
    List(Vec<T>),
    /// Range symmetrically over the bound of the neighbouring interior step.
    Ranged,
}

/// Every combination obtained by picking one candidate per step.
///
/// The row count is the exact product of the per-step candidate counts
/// (zero when any list is empty). The count is computed with overflow
/// checks before anything is allocated.
pub fn all_combinations<T: Element>(steps: &[Candidates<T>]) -> Result<RecordArray<T>> {
    if steps.is_empty() {
        return Err(CtpError::ShapeMismatch {
            what: "step count",
            expected: 1,
            found: 0,
        });
    }
    let columns = steps
        .iter()
        .map(Candidates::values)
        .collect::<Result<Vec<_>>>()?;
    cartesian(&columns)
}

fn cartesian<T: Element>(columns: &[Vec<T>]) -> Result<RecordArray<T>> {
    let width = columns.len();
    let rows = columns
        .iter()
        .try_fold(1usize, |acc, col| acc.checked_mul(col.len()))
        .ok_or(CtpError::RowCountOverflow)?;
    let total = rows.checked_mul(width).ok_or(CtpError::RowCountOverflow)?;

    let mut data = Vec::new();
    reserve_rows(&mut data, total)?;
    // Odometer over column positions, last column spinning fastest.
    let mut digits = vec![0usize; width];
    for _ in 0..rows {
        data.extend(digits.iter().zip(columns).map(|(&d, col)| col[d]));
        for k in (0..width).rev() {
            digits[k] += 1;
            if digits[k] < columns[k].len() {
                break;
            }
            digits[k] = 0;
        }
    }
    RecordArray::from_flat(width, data)
}

/// Reserve room for `total` elements up front. An allocation that cannot be
/// satisfied is reported instead of aborting the process.
fn reserve_rows<T>(data: &mut Vec<T>, total: usize) -> Result<()> {
    data.try_reserve_exact(total).map_err(|_| CtpError::RowCountOverflow)
}

/// All coherence transfer pathways through `step_count` pulse blocks.
///
/// Column 0 is the start order, column `step_count - 1` the end order, and
/// the `step_count - 2` interior columns range from `+bound` down to
/// `-bound`. With a per-step bound, the list must hold one bound per
/// interior column; a ranged endpoint uses the bound of the interior column
/// next to it.
///
/// The per-step list has `step_count - 2` entries, not `step_count - 1`:
/// the endpoints are not interior steps and carry no bound of their own, so
/// `pathway_space(3, &StepBound::PerStep(vec![1]), ..)` enumerates
/// `[0, 1, -1], [0, 0, -1], [0, -1, -1]` for a start of 0 and an end of -1.
pub fn pathway_space<T: Element>(
    step_count: usize,
    bound: &StepBound<T>,
    start: &Endpoint<T>,
    end: &Endpoint<T>,
) -> Result<RecordArray<T>> {
    if step_count < 2 {
        return Err(CtpError::InvalidArgument(format!(
            "a pathway needs at least 2 steps, got {}",
            step_count
        )));
    }
    let interior = step_count - 2;

    let bounds = match bound {
        StepBound::Shared(b) => vec![*b; interior],
        StepBound::PerStep(v) => {
            if v.len() != interior {
                return Err(CtpError::ShapeMismatch {
                    what: "per-step bound count",
                    expected: interior,
                    found: v.len(),
                });
            }
            v.clone()
        }
    };
    let (first_bound, last_bound) = match bound {
        StepBound::Shared(b) => (Some(*b), Some(*b)),
        StepBound::PerStep(v) => (v.first().copied(), v.last().copied()),
    };

    let mut steps = Vec::with_capacity(step_count);
    steps.push(endpoint_candidates(start, first_bound)?);
    steps.extend(bounds.into_iter().map(Candidates::Symmetric));
    steps.push(endpoint_candidates(end, last_bound)?);

    let space = all_combinations(&steps)?;
    tracing::debug!(step_count, rows = space.len(), "pathway space generated");
    Ok(space)
}

fn endpoint_candidates<T: Element>(
    endpoint: &Endpoint<T>,
    bound: Option<T>,
) -> Result<Candidates<T>> {
    match endpoint {
        Endpoint::Fixed(v) => Ok(Candidates::Value(*v)),
        Endpoint::List(v) => Ok(Candidates::List(v.clone())),
        Endpoint::Ranged => bound.map(Candidates::Symmetric).ok_or_else(|| {
            CtpError::InvalidArgument("ranged endpoint needs an interior bound".to_string())
        }),
    }
}

/// The integers `start .. start + steps`, one per row, written in base
/// `divisor` with `digits` digits, most significant first. Digits beyond
/// `digits` are dropped. Used to enumerate winding-number combinations.
pub fn base_digits<T: Element>(
    start: u64,
    steps: usize,
    digits: usize,
    divisor: u64,
) -> Result<RecordArray<T>> {
    if steps == 0 {
        return Err(CtpError::InvalidArgument("there must be at least one step".to_string()));
    }
    if digits == 0 {
        return Err(CtpError::InvalidArgument("there must be at least one digit".to_string()));
    }
    if divisor == 0 || divisor > i64::MAX as u64 {
        return Err(CtpError::InvalidArgument(format!("invalid divisor {}", divisor)));
    }
    let total = steps.checked_mul(digits).ok_or(CtpError::RowCountOverflow)?;
    let last = start
        .checked_add(steps as u64 - 1)
        .ok_or(CtpError::RowCountOverflow)?;

    let mut data = Vec::new();
    reserve_rows(&mut data, total)?;
    let mut row = vec![0i64; digits];
    for value in start..=last {
        let mut rest = value;
        for slot in row.iter_mut().rev() {
            *slot = (rest % divisor) as i64;
            rest /= divisor;
        }
        for &d in &row {
            data.push(narrow(d)?);
        }
    }
    RecordArray::from_flat(digits, data)
}
