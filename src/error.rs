//! Error types for applying diffs to a cache.
//!
//! None of these are recoverable at runtime: each one means the stream of
//! updates has drifted away from the list the cache is tracking. The
//! panicking entry points format them into the panic message; the `try_*`
//! entry points hand them back so an integration layer can log and resync.

use listdiff::ListUpdate;
use thiserror::Error;

/// Errors raised when a diff does not line up with the cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// An update addresses positions outside the cache.
    #[error("{update} is out of bounds for a cache of {len} slots")]
    OutOfBounds {
        /// The offending update.
        update: ListUpdate,
        /// Cache length when the update was checked.
        len: usize,
    },

    /// After a batch, the cache and the source list disagree on length.
    #[error("cache holds {actual} slots but the source list has {expected} items")]
    LengthMismatch {
        /// Source list length.
        expected: usize,
        /// Cache length.
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_update() {
        let err = DiffError::OutOfBounds {
            update: ListUpdate::Removed { position: 2, count: 3 },
            len: 4,
        };
        assert_eq!(err.to_string(), "removed(2, 3) is out of bounds for a cache of 4 slots");

        let err = DiffError::LengthMismatch { expected: 5, actual: 3 };
        assert_eq!(err.to_string(), "cache holds 3 slots but the source list has 5 items");
    }
}
