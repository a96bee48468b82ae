//! `stockledger-core`: domain building blocks shared by the ledger crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::Aggregate;
pub use entity::Entity;
pub use error::{LedgerError, LedgerResult};
pub use event::Event;
pub use id::{ItemId, ReservationToken};
pub use value_object::{ManufactureDate, ValueObject};
