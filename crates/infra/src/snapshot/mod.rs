//! Snapshot persistence for the ledger store.
//!
//! A snapshot is three sequential blocks (stock, reserved, sold), each a record
//! count followed by that many records. Encoding is `bincode` 1.x with its default
//! options: little-endian fixed-width integers, `u64` length prefixes for strings,
//! one tag byte for `Option`. There is no magic number and no version tag.
//!
//! ## Failure semantics
//!
//! - **Save**: any I/O or encoding failure is returned to the caller. The path
//!   helper writes to a sibling temporary file and renames it into place only
//!   after a successful flush, so a failed save never replaces a good file.
//! - **Load**: the store is cleared first, then the three blocks are decoded in
//!   full and validated. Only a complete, valid snapshot is installed; on any
//!   failure the store is left empty rather than partially populated.

mod codec;
mod file;

pub use codec::{load, save};
pub use file::{load_from_path, save_to_path};

use thiserror::Error;

/// Persistence failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading from or writing to the byte stream failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be encoded or decoded as ledger records.
    #[error("snapshot encoding failed: {0}")]
    Encoding(bincode::Error),

    /// Decoded records break a ledger invariant (e.g. duplicate identifiers).
    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

impl From<bincode::Error> for SnapshotError {
    fn from(value: bincode::Error) -> Self {
        match *value {
            bincode::ErrorKind::Io(err) => SnapshotError::Io(err),
            other => SnapshotError::Encoding(Box::new(other)),
        }
    }
}
