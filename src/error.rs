//! Error types for archive and ftable parsing.

use thiserror::Error;

/// Result type for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from the public API.
///
/// Detection failing to recognise any of the four record kinds is *not*
/// an error: it surfaces as a single [`crate::record::Record::Unknown`]
/// record instead (see [`crate::archive::Archive::load_from_bytes`]).
#[derive(Error, Debug)]
pub enum Error {
    /// A detector or parser needed more bytes than the input provided.
    #[error("input too short: need at least {needed} bytes, have {available}")]
    InputTooShort { needed: usize, available: usize },

    /// Reserved for parity with the source implementation's checked
    /// allocations. Rust's global allocator aborts rather than
    /// returning a recoverable failure, so nothing in this crate
    /// constructs this variant today.
    #[error("allocation failed")]
    AllocationFailed,

    /// Propagated from an external reader (e.g. an ftable/vtable source).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
