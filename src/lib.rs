// Allow pre-existing clippy lints across the codebase
#![allow(
    clippy::needless_range_loop,
    clippy::len_without_is_empty,
    clippy::doc_lazy_continuation,
    clippy::manual_range_contains,
    clippy::too_many_arguments
)]

//! Enumeration, sorting, deduplication and selection of coherence transfer
//! pathways (CTPs) for phase-cycle design.
//!
//! A pathway is a fixed-length integer record, one coherence order per pulse
//! block. Candidate sets come out of [`combis`], are ordered by [`sort`],
//! checked by [`uniq`] and [`comm`], materialized by [`permute`], front-loaded
//! by [`select`], and dispatched over many independent arrays at once by
//! [`batch`]. All arithmetic is exact integer and the library does no I/O.

pub mod batch;
pub mod combis;
pub mod comm;
pub mod common;
pub mod permute;
pub mod select;
pub mod sort;
pub mod uniq;

pub use common::{CtpError, Element, NotUnique, Permutation, RecordArray, RecordBatch, Result};
