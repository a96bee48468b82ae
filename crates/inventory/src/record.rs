//! Stock-keeping records held by the three ledgers.
//!
//! Each ledger has its own record shape, joined by the shared [`ItemId`] key:
//! stock rows describe the goods, reservation rows freeze a price under a token,
//! and sale rows aggregate completed sales by `(id, price)`.

use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, ItemId, ManufactureDate, ReservationToken};

/// Units currently available for sale, plus the descriptive fields of the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub(crate) id: ItemId,
    pub(crate) quantity: u64,
    /// Price in smallest currency unit; `None` until set.
    pub(crate) price: Option<u64>,
    pub(crate) manufacturer: String,
    pub(crate) name: String,
    pub(crate) made: ManufactureDate,
    pub(crate) free_text: Option<String>,
}

impl StockRecord {
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> Option<u64> {
        self.price
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn made(&self) -> ManufactureDate {
        self.made
    }

    pub fn free_text(&self) -> Option<&str> {
        self.free_text.as_deref()
    }
}

impl Entity for StockRecord {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Units held for a customer under a token, at the price current when reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub(crate) token: ReservationToken,
    pub(crate) id: ItemId,
    pub(crate) quantity: u64,
    pub(crate) price: u64,
}

impl Reservation {
    pub fn token(&self) -> ReservationToken {
        self.token
    }

    pub fn item_id(&self) -> &ItemId {
        &self.id
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    /// Quantity times frozen price.
    pub fn value(&self) -> u64 {
        self.quantity.saturating_mul(self.price)
    }
}

impl Entity for Reservation {
    type Id = ReservationToken;

    fn id(&self) -> &ReservationToken {
        &self.token
    }
}

/// Completed sales of one identifier at one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub(crate) id: ItemId,
    pub(crate) quantity: u64,
    pub(crate) price: u64,
}

impl SaleRecord {
    pub fn item_id(&self) -> &ItemId {
        &self.id
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn revenue(&self) -> u64 {
        self.quantity.saturating_mul(self.price)
    }

    pub(crate) fn matches(&self, id: &ItemId, price: u64) -> bool {
        self.id == *id && self.price == price
    }
}

/// The three ordered ledgers as plain data.
///
/// Used to persist a store and to compare whole stores by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub stock: Vec<StockRecord>,
    pub reserved: Vec<Reservation>,
    pub sold: Vec<SaleRecord>,
}

impl LedgerSnapshot {
    /// Returns a description of the first broken ledger invariant, if any.
    ///
    /// Checked: unique stock identifiers, manufacture months in range, unique live
    /// tokens, no duplicate `(id, price)` sale rows, and no zero price on any row.
    pub fn first_violation(&self) -> Option<String> {
        for (idx, record) in self.stock.iter().enumerate() {
            if self.stock[..idx].iter().any(|r| r.id == record.id) {
                return Some(format!("duplicate stock identifier {}", record.id));
            }
            if record.price == Some(0) {
                return Some(format!("stock record {} carries a zero price", record.id));
            }
            if !(1..=12).contains(&record.made.month()) {
                return Some(format!(
                    "stock record {} has month {}",
                    record.id,
                    record.made.month()
                ));
            }
        }
        for (idx, reservation) in self.reserved.iter().enumerate() {
            if self.reserved[..idx]
                .iter()
                .any(|r| r.token == reservation.token)
            {
                return Some(format!("duplicate reservation token {}", reservation.token));
            }
            if reservation.price == 0 {
                return Some(format!(
                    "reservation {} carries a zero price",
                    reservation.token
                ));
            }
        }
        for (idx, sale) in self.sold.iter().enumerate() {
            if self.sold[..idx]
                .iter()
                .any(|s| s.matches(&sale.id, sale.price))
            {
                return Some(format!(
                    "duplicate sale row for {} at price {}",
                    sale.id, sale.price
                ));
            }
            if sale.price == 0 {
                return Some(format!("sale row for {} carries a zero price", sale.id));
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty() && self.reserved.is_empty() && self.sold.is_empty()
    }
}
