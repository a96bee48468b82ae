//! Domain error model.

use thiserror::Error;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant names exactly one violated precondition, so callers can recover
/// precisely (e.g. set a price, then retry the sale). Persistence failures are an
/// infrastructure concern and live in `stockledger-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A quantity was zero (or would overflow the stock counter).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// An identifier is not 8 hex digits with a leading digit in `0`..=`7`, or is
    /// a rename target already naming other stock or reservations.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A manufacture month outside `1..=12`.
    #[error("invalid month: {0}")]
    InvalidMonth(u8),

    /// A price below one minor currency unit.
    #[error("invalid price: {0}")]
    InvalidPrice(u64),

    /// Re-adding an identifier with different descriptive fields (or a reserve
    /// command carrying an already-live token).
    #[error("identifier mismatch for {id}: {reason}")]
    IdentifierMismatch { id: String, reason: String },

    /// The identifier does not appear in the ledgers being scanned.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// No live reservation carries this token.
    #[error("unknown reservation: {0}")]
    UnknownReservation(u32),

    /// The stock record exists but holds zero units.
    #[error("out of stock: {0}")]
    OutOfStock(String),

    /// The stock record holds fewer units than requested.
    #[error("insufficient stock for {id}: requested {requested}, available {available}")]
    InsufficientStock {
        id: String,
        requested: u64,
        available: u64,
    },

    /// The stock record has no price yet.
    #[error("price not set: {0}")]
    PriceNotSet(String),
}

impl LedgerError {
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_identifier(raw: impl Into<String>) -> Self {
        Self::InvalidIdentifier(raw.into())
    }

    pub fn mismatch(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IdentifierMismatch {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_identifier(id: impl Into<String>) -> Self {
        Self::UnknownIdentifier(id.into())
    }
}
