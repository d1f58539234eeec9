pub mod error;
pub mod record;

#[cfg(test)]
mod tests;

pub use self::error::{CtpError, NotUnique, Result};
pub use self::record::{Element, Permutation, RecordArray, RecordBatch, narrow};

/// Reset SIGPIPE to SIG_DFL so piping into `head` ends the process quietly.
/// Rust ignores SIGPIPE by default. Call this at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
