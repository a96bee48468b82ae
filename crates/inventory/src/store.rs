use tracing::debug;

use stockledger_core::entity::position_of;
use stockledger_core::{
    Aggregate, Event, ItemId, LedgerError, LedgerResult, ManufactureDate, ReservationToken,
};

use crate::command::{
    AddStock, IdentifierRenamed, LedgerCommand, LedgerEvent, PriceSet, RenameIdentifier, Reserve,
    ReservationFinalized, ReservationReleased, Sell, SetPrice, StockAdded, UnitsReserved,
    UnitsSold,
};
use crate::record::{LedgerSnapshot, Reservation, SaleRecord, StockRecord};
use crate::token::{RandomTokenSource, TokenSource};

/// Validate the format of an identifier.
///
/// Every operation that takes an identifier runs this first.
pub fn validate_id(raw: &str) -> LedgerResult<ItemId> {
    ItemId::parse(raw)
}

/// Aggregate root: the stock, reserved and sold ledgers of one product category.
///
/// Every mutating operation is decided by `handle` against the current state and
/// only then applied, so a failed call leaves all three ledgers unchanged.
#[derive(Debug)]
pub struct LedgerStore {
    stock: Vec<StockRecord>,
    reserved: Vec<Reservation>,
    sold: Vec<SaleRecord>,
    tokens: Box<dyn TokenSource>,
    version: u64,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore {
    /// Empty store drawing reservation tokens from OS entropy.
    pub fn new() -> Self {
        Self::with_token_source(RandomTokenSource::from_entropy())
    }

    /// Empty store drawing reservation tokens from `tokens`.
    pub fn with_token_source(tokens: impl TokenSource + 'static) -> Self {
        Self {
            stock: Vec::new(),
            reserved: Vec::new(),
            sold: Vec::new(),
            tokens: Box::new(tokens),
            version: 0,
        }
    }

    /// Add `quantity` units, merging into the existing record for `id` when the
    /// manufacturer and name match. Free text is not compared on merge.
    pub fn add_stock(
        &mut self,
        quantity: u64,
        manufacturer: &str,
        name: &str,
        id: &str,
        year: i16,
        month: u8,
    ) -> LedgerResult<()> {
        self.add(quantity, manufacturer, name, id, year, month, None)
    }

    /// Like [`add_stock`](Self::add_stock), but the free text must also match on merge.
    #[allow(clippy::too_many_arguments)]
    pub fn add_stock_with_details(
        &mut self,
        quantity: u64,
        manufacturer: &str,
        name: &str,
        id: &str,
        year: i16,
        month: u8,
        free_text: &str,
    ) -> LedgerResult<()> {
        self.add(quantity, manufacturer, name, id, year, month, Some(free_text))
    }

    #[allow(clippy::too_many_arguments)]
    fn add(
        &mut self,
        quantity: u64,
        manufacturer: &str,
        name: &str,
        id: &str,
        year: i16,
        month: u8,
        free_text: Option<&str>,
    ) -> LedgerResult<()> {
        let id = validate_id(id)?;
        self.execute(&LedgerCommand::AddStock(AddStock {
            id,
            quantity,
            manufacturer: manufacturer.to_owned(),
            name: name.to_owned(),
            year,
            month,
            free_text: free_text.map(str::to_owned),
        }))?;
        Ok(())
    }

    pub fn set_price(&mut self, id: &str, price: u64) -> LedgerResult<()> {
        let id = validate_id(id)?;
        self.execute(&LedgerCommand::SetPrice(SetPrice { id, price }))?;
        Ok(())
    }

    /// Sell `quantity` units straight from stock at the current stock price.
    pub fn sell(&mut self, quantity: u64, id: &str) -> LedgerResult<()> {
        let id = validate_id(id)?;
        self.execute(&LedgerCommand::Sell(Sell { id, quantity }))?;
        Ok(())
    }

    /// Move `quantity` units from stock into a new reservation at the current price.
    ///
    /// A rejected reservation may still have consumed a draw from the token source;
    /// the ledgers themselves are untouched.
    pub fn reserve(&mut self, quantity: u64, id: &str) -> LedgerResult<ReservationToken> {
        let id = validate_id(id)?;
        let token = self.mint_token();
        self.execute(&LedgerCommand::Reserve(Reserve {
            id,
            quantity,
            token,
        }))?;
        Ok(token)
    }

    /// Cancel a reservation, returning its units to stock.
    pub fn unreserve(&mut self, token: ReservationToken) -> LedgerResult<()> {
        self.execute(&LedgerCommand::Unreserve(token))?;
        Ok(())
    }

    /// Turn a reservation into a sale.
    ///
    /// The customer pays the lower of the reserved price and the current stock price.
    pub fn finalize_reservation(&mut self, token: ReservationToken) -> LedgerResult<()> {
        self.execute(&LedgerCommand::FinalizeReservation(token))?;
        Ok(())
    }

    /// Clear the sold ledger; stock and reservations are kept.
    pub fn reset_sales_tracking(&mut self) {
        // Never rejected.
        let _ = self.execute(&LedgerCommand::ResetSalesTracking);
    }

    /// Clear all three ledgers.
    pub fn empty(&mut self) {
        // Never rejected.
        let _ = self.execute(&LedgerCommand::Empty);
    }

    /// Rewrite `from` to `to` on every stock and reservation record.
    ///
    /// Sold records keep the identifier they were sold under. A `to` that already
    /// names other stock or reservations is `InvalidIdentifier`.
    pub fn rename_identifier(&mut self, from: &str, to: &str) -> LedgerResult<()> {
        let from = validate_id(from)?;
        let to = validate_id(to)?;
        self.execute(&LedgerCommand::RenameIdentifier(RenameIdentifier { from, to }))?;
        Ok(())
    }

    /// Draw candidates until one is not held by a live reservation.
    fn mint_token(&mut self) -> ReservationToken {
        loop {
            let candidate = self.tokens.next_candidate();
            if position_of(&self.reserved, &candidate).is_none() {
                return candidate;
            }
            debug!(token = candidate.get(), "reservation token collision; redrawing");
        }
    }
}

// Queries.
impl LedgerStore {
    pub fn stock(&self) -> &[StockRecord] {
        &self.stock
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reserved
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sold
    }

    pub fn stock_record(&self, id: &ItemId) -> Option<&StockRecord> {
        position_of(&self.stock, id).map(|idx| &self.stock[idx])
    }

    pub fn reservation(&self, token: ReservationToken) -> Option<&Reservation> {
        position_of(&self.reserved, &token).map(|idx| &self.reserved[idx])
    }

    /// Units on hand: available plus reserved.
    pub fn total_units(&self) -> u64 {
        sum(self.stock.iter().map(StockRecord::quantity))
            .saturating_add(self.reserved_units())
    }

    /// Units on hand for one identifier, available plus reserved.
    pub fn total_units_of(&self, id: &str) -> LedgerResult<u64> {
        let id = validate_id(id)?;
        let in_stock = self.stock.iter().filter(|r| r.id == id);
        let held = self.reserved.iter().filter(|r| r.id == id);
        if in_stock.clone().next().is_none() && held.clone().next().is_none() {
            return Err(LedgerError::unknown_identifier(id.as_str()));
        }
        let available = sum(in_stock.map(StockRecord::quantity));
        Ok(available.saturating_add(sum(held.map(Reservation::quantity))))
    }

    /// Units held in live reservations.
    pub fn reserved_units(&self) -> u64 {
        sum(self.reserved.iter().map(Reservation::quantity))
    }

    /// Number of identifiers ever stocked (records are kept at zero quantity).
    pub fn distinct_item_count(&self) -> usize {
        self.stock.len()
    }

    pub fn units_sold(&self) -> u64 {
        sum(self.sold.iter().map(SaleRecord::quantity))
    }

    /// Units sold for one identifier.
    ///
    /// An identifier with no sale rows is `UnknownIdentifier`, even when it is
    /// stocked; a caller wanting zero must map the error.
    pub fn units_sold_of(&self, id: &str) -> LedgerResult<u64> {
        let rows = self.sales_of(id)?;
        Ok(sum(rows.iter().map(|r| r.quantity)))
    }

    pub fn total_revenue(&self) -> u64 {
        sum(self.sold.iter().map(SaleRecord::revenue))
    }

    /// Revenue for one identifier, summed over every price it sold at.
    pub fn revenue_of(&self, id: &str) -> LedgerResult<u64> {
        let rows = self.sales_of(id)?;
        Ok(sum(rows.iter().map(|r| r.revenue())))
    }

    /// Value of live reservations at their frozen prices.
    pub fn reserved_value(&self) -> u64 {
        sum(self.reserved.iter().map(Reservation::value))
    }

    /// Free text of a stock record; empty when none was given.
    pub fn details(&self, id: &str) -> LedgerResult<&str> {
        let id = validate_id(id)?;
        let record = self
            .stock_record(&id)
            .ok_or_else(|| LedgerError::unknown_identifier(id.as_str()))?;
        Ok(record.free_text().unwrap_or_default())
    }

    fn sales_of(&self, id: &str) -> LedgerResult<Vec<&SaleRecord>> {
        let id = validate_id(id)?;
        let rows: Vec<&SaleRecord> = self.sold.iter().filter(|r| r.id == id).collect();
        if rows.is_empty() {
            return Err(LedgerError::unknown_identifier(id));
        }
        Ok(rows)
    }
}

// Snapshots.
impl LedgerStore {
    /// Copy of the three ledgers.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            stock: self.stock.clone(),
            reserved: self.reserved.clone(),
            sold: self.sold.clone(),
        }
    }

    /// Replace the three ledgers wholesale.
    ///
    /// The token source and version counter are kept; the version still advances.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.stock = snapshot.stock;
        self.reserved = snapshot.reserved;
        self.sold = snapshot.sold;
        self.version += 1;
    }
}

fn sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

impl Aggregate for LedgerStore {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::StockAdded(e) => match position_of(&self.stock, &e.id) {
                Some(idx) => {
                    let record = &mut self.stock[idx];
                    record.quantity = record.quantity.saturating_add(e.quantity);
                    record.made = e.made;
                }
                None => self.stock.push(StockRecord {
                    id: e.id.clone(),
                    quantity: e.quantity,
                    price: None,
                    manufacturer: e.manufacturer.clone(),
                    name: e.name.clone(),
                    made: e.made,
                    free_text: e.free_text.clone(),
                }),
            },
            LedgerEvent::PriceSet(e) => {
                if let Some(idx) = position_of(&self.stock, &e.id) {
                    self.stock[idx].price = Some(e.price);
                }
            }
            LedgerEvent::UnitsSold(e) => {
                self.take_from_stock(&e.id, e.quantity);
                self.record_sale(&e.id, e.quantity, e.price);
            }
            LedgerEvent::UnitsReserved(e) => {
                self.take_from_stock(&e.id, e.quantity);
                self.reserved.push(Reservation {
                    token: e.token,
                    id: e.id.clone(),
                    quantity: e.quantity,
                    price: e.price,
                });
            }
            LedgerEvent::ReservationReleased(e) => {
                self.remove_reservation(e.token);
                if let Some(idx) = position_of(&self.stock, &e.id) {
                    let record = &mut self.stock[idx];
                    record.quantity = record.quantity.saturating_add(e.quantity);
                }
            }
            LedgerEvent::ReservationFinalized(e) => {
                self.remove_reservation(e.token);
                self.record_sale(&e.id, e.quantity, e.price);
            }
            LedgerEvent::SalesTrackingReset => self.sold.clear(),
            LedgerEvent::LedgerEmptied => {
                self.stock.clear();
                self.reserved.clear();
                self.sold.clear();
            }
            LedgerEvent::IdentifierRenamed(e) => {
                for record in self.stock.iter_mut().filter(|r| r.id == e.from) {
                    record.id = e.to.clone();
                }
                for reservation in self.reserved.iter_mut().filter(|r| r.id == e.from) {
                    reservation.id = e.to.clone();
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
        debug!(
            event_type = event.event_type(),
            version = self.version,
            "ledger event applied"
        );
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddStock(cmd) => self.handle_add(cmd),
            LedgerCommand::SetPrice(cmd) => self.handle_set_price(cmd),
            LedgerCommand::Sell(cmd) => self.handle_sell(cmd),
            LedgerCommand::Reserve(cmd) => self.handle_reserve(cmd),
            LedgerCommand::Unreserve(token) => self.handle_unreserve(*token),
            LedgerCommand::FinalizeReservation(token) => self.handle_finalize(*token),
            LedgerCommand::ResetSalesTracking => Ok(vec![LedgerEvent::SalesTrackingReset]),
            LedgerCommand::Empty => Ok(vec![LedgerEvent::LedgerEmptied]),
            LedgerCommand::RenameIdentifier(cmd) => self.handle_rename(cmd),
        }
    }
}

impl LedgerStore {
    fn take_from_stock(&mut self, id: &ItemId, quantity: u64) {
        if let Some(idx) = position_of(&self.stock, id) {
            let record = &mut self.stock[idx];
            record.quantity = record.quantity.saturating_sub(quantity);
        }
    }

    /// Merge into the `(id, price)` sale row, or append a new one.
    fn record_sale(&mut self, id: &ItemId, quantity: u64, price: u64) {
        match self.sold.iter_mut().find(|r| r.matches(id, price)) {
            Some(row) => row.quantity = row.quantity.saturating_add(quantity),
            None => self.sold.push(SaleRecord {
                id: id.clone(),
                quantity,
                price,
            }),
        }
    }

    fn remove_reservation(&mut self, token: ReservationToken) {
        if let Some(idx) = position_of(&self.reserved, &token) {
            self.reserved.remove(idx);
        }
    }

    fn live_reservation(&self, token: ReservationToken) -> LedgerResult<&Reservation> {
        self.reservation(token)
            .ok_or(LedgerError::UnknownReservation(token.get()))
    }

    /// Shared preconditions of selling and reserving; returns the current price.
    fn ensure_available(&self, id: &ItemId, quantity: u64) -> LedgerResult<u64> {
        ensure_quantity(quantity)?;
        let record = self
            .stock_record(id)
            .ok_or_else(|| LedgerError::unknown_identifier(id.as_str()))?;
        let price = record
            .price
            .ok_or_else(|| LedgerError::PriceNotSet(id.to_string()))?;
        if record.quantity == 0 {
            return Err(LedgerError::OutOfStock(id.to_string()));
        }
        if record.quantity < quantity {
            return Err(LedgerError::InsufficientStock {
                id: id.to_string(),
                requested: quantity,
                available: record.quantity,
            });
        }
        Ok(price)
    }

    fn handle_add(&self, cmd: &AddStock) -> Result<Vec<LedgerEvent>, LedgerError> {
        ensure_quantity(cmd.quantity)?;
        let made = ManufactureDate::new(cmd.year, cmd.month)?;

        if let Some(existing) = self.stock_record(&cmd.id) {
            if existing.manufacturer != cmd.manufacturer || existing.name != cmd.name {
                return Err(LedgerError::mismatch(
                    cmd.id.as_str(),
                    "manufacturer or name differs from the stocked record",
                ));
            }
            if let Some(text) = &cmd.free_text {
                if existing.free_text.as_deref() != Some(text.as_str()) {
                    return Err(LedgerError::mismatch(
                        cmd.id.as_str(),
                        "free text differs from the stocked record",
                    ));
                }
            }
            if existing.quantity.checked_add(cmd.quantity).is_none() {
                return Err(LedgerError::invalid_quantity(
                    "stock quantity would overflow",
                ));
            }
        }

        Ok(vec![LedgerEvent::StockAdded(StockAdded {
            id: cmd.id.clone(),
            quantity: cmd.quantity,
            manufacturer: cmd.manufacturer.clone(),
            name: cmd.name.clone(),
            made,
            free_text: cmd.free_text.clone(),
        })])
    }

    fn handle_set_price(&self, cmd: &SetPrice) -> Result<Vec<LedgerEvent>, LedgerError> {
        if cmd.price == 0 {
            return Err(LedgerError::InvalidPrice(cmd.price));
        }
        if self.stock_record(&cmd.id).is_none() {
            return Err(LedgerError::unknown_identifier(cmd.id.as_str()));
        }
        Ok(vec![LedgerEvent::PriceSet(PriceSet {
            id: cmd.id.clone(),
            price: cmd.price,
        })])
    }

    fn handle_sell(&self, cmd: &Sell) -> Result<Vec<LedgerEvent>, LedgerError> {
        let price = self.ensure_available(&cmd.id, cmd.quantity)?;
        Ok(vec![LedgerEvent::UnitsSold(UnitsSold {
            id: cmd.id.clone(),
            quantity: cmd.quantity,
            price,
        })])
    }

    fn handle_reserve(&self, cmd: &Reserve) -> Result<Vec<LedgerEvent>, LedgerError> {
        let price = self.ensure_available(&cmd.id, cmd.quantity)?;
        // `reserve` always mints a fresh token; this only guards direct `handle`
        // callers that supply a token of their own.
        if self.reservation(cmd.token).is_some() {
            return Err(LedgerError::mismatch(
                cmd.token.to_string(),
                "token already held by a live reservation",
            ));
        }
        Ok(vec![LedgerEvent::UnitsReserved(UnitsReserved {
            token: cmd.token,
            id: cmd.id.clone(),
            quantity: cmd.quantity,
            price,
        })])
    }

    fn handle_unreserve(&self, token: ReservationToken) -> Result<Vec<LedgerEvent>, LedgerError> {
        let reservation = self.live_reservation(token)?;
        Ok(vec![LedgerEvent::ReservationReleased(ReservationReleased {
            token,
            id: reservation.id.clone(),
            quantity: reservation.quantity,
        })])
    }

    fn handle_finalize(&self, token: ReservationToken) -> Result<Vec<LedgerEvent>, LedgerError> {
        let reservation = self.live_reservation(token)?;
        let current = self.stock_record(&reservation.id).and_then(StockRecord::price);
        let price = match current {
            Some(current) if current < reservation.price => current,
            _ => reservation.price,
        };
        Ok(vec![LedgerEvent::ReservationFinalized(ReservationFinalized {
            token,
            id: reservation.id.clone(),
            quantity: reservation.quantity,
            price,
        })])
    }

    fn handle_rename(&self, cmd: &RenameIdentifier) -> Result<Vec<LedgerEvent>, LedgerError> {
        if !self.knows(&cmd.from) {
            return Err(LedgerError::unknown_identifier(cmd.from.as_str()));
        }
        if cmd.from == cmd.to {
            return Ok(vec![]);
        }
        // A taken replacement would fold two items into one record.
        if self.knows(&cmd.to) {
            return Err(LedgerError::invalid_identifier(cmd.to.as_str()));
        }
        Ok(vec![LedgerEvent::IdentifierRenamed(IdentifierRenamed {
            from: cmd.from.clone(),
            to: cmd.to.clone(),
        })])
    }

    /// Whether `id` appears in the stock or reserved ledger.
    fn knows(&self, id: &ItemId) -> bool {
        self.stock_record(id).is_some() || self.reserved.iter().any(|r| r.id == *id)
    }
}

fn ensure_quantity(quantity: u64) -> LedgerResult<()> {
    if quantity == 0 {
        return Err(LedgerError::invalid_quantity("quantity must be at least 1"));
    }
    Ok(())
}
