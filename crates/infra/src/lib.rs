//! Infrastructure around the ledger store: persistence, configuration and
//! thread-safe sharing.
//!
//! The store itself lives in `stockledger-inventory` and knows nothing about
//! byte streams or threads; this crate adds those boundaries.

pub mod config;
pub mod shared;
pub mod snapshot;

pub use config::LedgerConfig;
pub use shared::SharedLedger;
pub use snapshot::SnapshotError;
