//! Commands accepted by the ledger store and the events they produce.

use serde::{Deserialize, Serialize};

use stockledger_core::{Event, ItemId, ManufactureDate, ReservationToken};

/// Command: AddStock.
///
/// `free_text: None` is the short form: on merge the existing free text is not
/// compared. `Some(text)` must match the existing record's free text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStock {
    pub id: ItemId,
    pub quantity: u64,
    pub manufacturer: String,
    pub name: String,
    pub year: i16,
    pub month: u8,
    pub free_text: Option<String>,
}

/// Command: SetPrice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPrice {
    pub id: ItemId,
    pub price: u64,
}

/// Command: Sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sell {
    pub id: ItemId,
    pub quantity: u64,
}

/// Command: Reserve.
///
/// The token is minted by the store before the command is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    pub id: ItemId,
    pub quantity: u64,
    pub token: ReservationToken,
}

/// Command: RenameIdentifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameIdentifier {
    pub from: ItemId,
    pub to: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddStock(AddStock),
    SetPrice(SetPrice),
    Sell(Sell),
    Reserve(Reserve),
    Unreserve(ReservationToken),
    FinalizeReservation(ReservationToken),
    ResetSalesTracking,
    Empty,
    RenameIdentifier(RenameIdentifier),
}

/// Event: StockAdded.
///
/// Merges into the existing record for `id`, or appends a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub id: ItemId,
    pub quantity: u64,
    pub manufacturer: String,
    pub name: String,
    pub made: ManufactureDate,
    pub free_text: Option<String>,
}

/// Event: PriceSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSet {
    pub id: ItemId,
    pub price: u64,
}

/// Event: UnitsSold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsSold {
    pub id: ItemId,
    pub quantity: u64,
    pub price: u64,
}

/// Event: UnitsReserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsReserved {
    pub token: ReservationToken,
    pub id: ItemId,
    pub quantity: u64,
    pub price: u64,
}

/// Event: ReservationReleased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationReleased {
    pub token: ReservationToken,
    pub id: ItemId,
    pub quantity: u64,
}

/// Event: ReservationFinalized.
///
/// `price` is the settled price: the lower of the frozen and current stock price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFinalized {
    pub token: ReservationToken,
    pub id: ItemId,
    pub quantity: u64,
    pub price: u64,
}

/// Event: IdentifierRenamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRenamed {
    pub from: ItemId,
    pub to: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    StockAdded(StockAdded),
    PriceSet(PriceSet),
    UnitsSold(UnitsSold),
    UnitsReserved(UnitsReserved),
    ReservationReleased(ReservationReleased),
    ReservationFinalized(ReservationFinalized),
    SalesTrackingReset,
    LedgerEmptied,
    IdentifierRenamed(IdentifierRenamed),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::StockAdded(_) => "ledger.stock.added",
            LedgerEvent::PriceSet(_) => "ledger.stock.price_set",
            LedgerEvent::UnitsSold(_) => "ledger.sale.recorded",
            LedgerEvent::UnitsReserved(_) => "ledger.reservation.created",
            LedgerEvent::ReservationReleased(_) => "ledger.reservation.released",
            LedgerEvent::ReservationFinalized(_) => "ledger.reservation.finalized",
            LedgerEvent::SalesTrackingReset => "ledger.sales.reset",
            LedgerEvent::LedgerEmptied => "ledger.emptied",
            LedgerEvent::IdentifierRenamed(_) => "ledger.stock.renamed",
        }
    }
}
