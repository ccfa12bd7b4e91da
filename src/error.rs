//! Error types shared across the crate.

use std::collections::TryReserveError;

use thiserror::Error;

/// Convenience alias for results produced by table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by table operations.
///
/// Absent keys are never an error; lookups and removals report them as
/// `None`. The only fatal condition is running out of memory while
/// growing the bucket array.
#[derive(Debug, Error)]
pub enum Error {
    /// The bucket array for a grow could not be allocated. The live
    /// table has not been modified when this is returned.
    #[error("failed to allocate a {capacity}-bucket array for rehash")]
    AllocationFailed {
        /// Bucket count the failed grow was targeting.
        capacity: usize,
        /// Underlying reservation failure.
        #[source]
        source: TryReserveError,
    },
}
