//! Job-array planning.
//!
//! Partitions a (years × variables) download space into a linear sequence of
//! independent jobs so a batch scheduler can address each one by a single
//! integer index. Counting and decoding are pure functions of the same
//! inputs; the same index always yields the same job.

mod group;
mod space;

pub use group::group_years;
pub use space::{JobDescriptor, JobSpace};

use thiserror::Error;

/// Errors from building or indexing a job space.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobSpaceError {
    /// Index outside `[0, count)`, including any index when the space is empty.
    #[error("index {index} out of range for job space of {count} jobs")]
    IndexOutOfRange { index: usize, count: usize },

    /// Year-group size of zero can never partition anything.
    #[error("year group size must be at least 1")]
    InvalidGroupSize,

    /// A variable may appear in at most one of the two catalogs.
    #[error("variable `{0}` appears in both the single-level and multi-level catalogs")]
    DuplicateVariable(String),
}
