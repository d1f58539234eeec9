use std::cmp::Ordering;

use crate::common::{CtpError, Element, RecordArray, Result, error::check_width};
use crate::sort::compare_rows;
use crate::uniq::is_sorted_unique;

/// Membership flags produced by `pairwise_membership`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// `a_in_b[i]`: row `i` of `a` also occurs in `b`.
    pub a_in_b: Vec<bool>,
    /// `b_in_a[j]`: row `j` of `b` also occurs in `a`.
    pub b_in_a: Vec<bool>,
}

impl Membership {
    /// Number of rows common to both inputs.
    pub fn shared(&self) -> usize {
        self.a_in_b.iter().filter(|&&x| x).count()
    }
}

/// Two-cursor merge scan over two strictly ascending arrays.
///
/// Both inputs must already be sorted and free of duplicates; either failing
/// that is reported as PreconditionViolated before any scanning.
pub fn pairwise_membership<T: Element>(
    a: &RecordArray<T>,
    b: &RecordArray<T>,
) -> Result<Membership> {
    if !a.is_empty() && !b.is_empty() {
        check_width(a.width(), b.width())?;
    }
    if !is_sorted_unique(a) {
        return Err(CtpError::PreconditionViolated(
            "`a` is not sorted or contains duplicate rows",
        ));
    }
    if !is_sorted_unique(b) {
        return Err(CtpError::PreconditionViolated(
            "`b` is not sorted or contains duplicate rows",
        ));
    }

    let n_a = a.len();
    let n_b = b.len();
    let mut a_in_b = vec![false; n_a];
    let mut b_in_a = vec![false; n_b];

    let mut i = 0usize;
    let mut j = 0usize;
    while i < n_a && j < n_b {
        match compare_rows(a.row(i), b.row(j)) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                a_in_b[i] = true;
                b_in_a[j] = true;
                i += 1;
                j += 1;
            }
        }
    }

    Ok(Membership { a_in_b, b_in_a })
}
