/// Wanted-pathway selection.
///
/// `select_front` is a stable partition, not a sort: the wanted rows come
/// first in the caller's order, followed by everything else of `full` in its
/// original order. Inputs are never mutated.
use crate::common::{CtpError, Element, NotUnique, RecordArray, Result, error::check_width};

/// Sentinel for "not matched yet" while locating wanted rows.
const UNMATCHED: usize = usize::MAX;

/// Reorder `full` so the rows listed in `wanted` come first.
///
/// Fails with PathwayNotFound when a wanted row is absent from `full`, and
/// with PathwayNotUnique when a wanted row matches several rows of `full` or
/// repeats an earlier wanted row. `row` in either error is the index into
/// `wanted`.
pub fn select_front<T: Element>(
    full: &RecordArray<T>,
    wanted: &RecordArray<T>,
) -> Result<RecordArray<T>> {
    let located = locate_wanted(full, wanted)?;

    let mut out = RecordArray::with_width(full.width());
    for &idx in &located {
        out.push_row(full.row(idx))?;
    }

    let mut taken = located;
    taken.sort_unstable();
    let mut next = taken.iter().copied().peekable();
    for (i, row) in full.rows().enumerate() {
        if next.peek() == Some(&i) {
            next.next();
            continue;
        }
        out.push_row(row)?;
    }

    debug_assert_eq!(out.len(), full.len());
    Ok(out)
}

/// For each wanted row, the index of its single match in `full`.
fn locate_wanted<T: Element>(full: &RecordArray<T>, wanted: &RecordArray<T>) -> Result<Vec<usize>> {
    if !wanted.is_empty() {
        check_width(full.width(), wanted.width())?;
    }

    let mut located = vec![UNMATCHED; wanted.len()];
    for (w, target) in wanted.rows().enumerate() {
        let mut count = 0usize;
        for (i, row) in full.rows().enumerate() {
            if row == target {
                if count == 0 {
                    located[w] = i;
                }
                count += 1;
            }
        }
        match count {
            0 => {
                tracing::debug!(row = w, "wanted pathway not found");
                return Err(CtpError::PathwayNotFound { row: w });
            }
            1 => {}
            count => {
                return Err(CtpError::PathwayNotUnique {
                    row: w,
                    reason: NotUnique::MultipleMatches { count },
                });
            }
        }
    }

    // Two wanted rows resolving to one full row means the wanted set repeats
    // itself. Report the later occurrence against the earlier one.
    for later in 1..located.len() {
        if let Some(first) = located[..later].iter().position(|&idx| idx == located[later]) {
            return Err(CtpError::PathwayNotUnique {
                row: later,
                reason: NotUnique::DuplicateWanted { first },
            });
        }
    }

    Ok(located)
}

/// Ascending indices of the rows of `full` equal to any row of `wanted`.
/// No validation: absent wanted rows are skipped, repeated ones contribute
/// every match.
pub fn wanted_indices<T: Element>(
    full: &RecordArray<T>,
    wanted: &RecordArray<T>,
) -> Result<Vec<usize>> {
    Ok(reference_mask(full, wanted)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, hit)| hit.then_some(i))
        .collect())
}

/// Per-row flag over `full`: the row equals some row of `wanted`. This is
/// the reference signal a perfect phase cycle would reproduce.
pub fn reference_mask<T: Element>(
    full: &RecordArray<T>,
    wanted: &RecordArray<T>,
) -> Result<Vec<bool>> {
    if !wanted.is_empty() && !full.is_empty() {
        check_width(full.width(), wanted.width())?;
    }
    Ok(full
        .rows()
        .map(|row| wanted.rows().any(|w| w == row))
        .collect())
}

/// Split `full` into (wanted rows, remaining rows), both in `full`'s order.
pub fn split_wanted<T: Element>(
    full: &RecordArray<T>,
    wanted: &RecordArray<T>,
) -> Result<(RecordArray<T>, RecordArray<T>)> {
    let mask = reference_mask(full, wanted)?;
    let mut hits = RecordArray::with_width(full.width());
    let mut rest = RecordArray::with_width(full.width());
    for (row, hit) in full.rows().zip(mask) {
        if hit {
            hits.push_row(row)?;
        } else {
            rest.push_row(row)?;
        }
    }
    Ok((hits, rest))
}
