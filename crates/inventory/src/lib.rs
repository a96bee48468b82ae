//! Inventory ledger for a single product category.
//!
//! Units move between three ledgers: available stock, reserved-but-unsold, and
//! sold. The rules live in [`LedgerStore`], implemented purely as deterministic
//! domain logic (no file IO, no locking). Persistence and shared access are in
//! `stockledger-infra`.

pub mod command;
pub mod record;
pub mod store;
pub mod token;

pub use command::{LedgerCommand, LedgerEvent};
pub use record::{LedgerSnapshot, Reservation, SaleRecord, StockRecord};
pub use store::{LedgerStore, validate_id};
pub use token::{RandomTokenSource, TokenSource};
