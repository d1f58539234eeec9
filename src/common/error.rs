use std::fmt;

/// Why a wanted pathway could not be placed unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotUnique {
    /// The wanted row matches `count` rows of the full set.
    MultipleMatches { count: usize },
    /// The wanted row repeats the wanted row at index `first`.
    DuplicateWanted { first: usize },
}

impl fmt::Display for NotUnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotUnique::MultipleMatches { count } => {
                write!(f, "it matches {} rows of the full set", count)
            }
            NotUnique::DuplicateWanted { first } => {
                write!(f, "it repeats wanted row {}", first)
            }
        }
    }
}

/// Errors reported by the pathway engine.
///
/// Every error is raised at the point of detection; nothing is retried.
/// An in-place call that returns an error leaves its target in an
/// unspecified state.
#[derive(Debug, thiserror::Error)]
pub enum CtpError {
    #[error("{what} mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(
        "invalid permutation: value {value} at position {position} is outside the unresolved range"
    )]
    InvalidPermutation { position: usize, value: usize },

    #[error("wanted pathway {row} does not appear in the full set")]
    PathwayNotFound { row: usize },

    #[error("wanted pathway {row} is not unique: {reason}")]
    PathwayNotUnique { row: usize, reason: NotUnique },

    #[error("precondition violated: {0}")]
    PreconditionViolated(&'static str),

    #[error("row count overflows the address space")]
    RowCountOverflow,

    #[error("value {value} does not fit the record element type")]
    ElementOverflow { value: i64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = CtpError> = std::result::Result<T, E>;

/// Check that a record width matches the one an array was built with.
#[inline]
pub(crate) fn check_width(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CtpError::ShapeMismatch {
            what: "record width",
            expected,
            found,
        })
    }
}
