//! Single-writer access to a ledger store shared across threads.
//!
//! Every call takes one exclusive lock for its whole duration, including the
//! read/write of a snapshot, so callers never observe a half-applied operation
//! or save an inconsistent snapshot.
//!
//! A poisoned lock is recovered rather than reported: the store validates every
//! command before mutating anything and its state transitions cannot fail, so
//! a panic in another caller cannot have left it half-updated.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use stockledger_core::{LedgerResult, ReservationToken};
use stockledger_inventory::{LedgerSnapshot, LedgerStore};

use crate::config::{DEFAULT_SNAPSHOT_PATH, LedgerConfig};
use crate::snapshot::{self, SnapshotError};

#[derive(Debug)]
pub struct SharedLedger {
    inner: Mutex<LedgerStore>,
    snapshot_path: PathBuf,
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new(LedgerStore::new())
    }
}

impl SharedLedger {
    /// Wrap `store`; [`persist`](Self::persist) writes to the default snapshot path.
    pub fn new(store: LedgerStore) -> Self {
        Self {
            inner: Mutex::new(store),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }

    /// Empty ledger with the configured token source and snapshot path.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            inner: Mutex::new(config.build_store()),
            snapshot_path: config.snapshot_path.clone(),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn into_inner(self) -> LedgerStore {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, LedgerStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access, e.g. to combine several operations into one.
    pub fn with<R>(&self, f: impl FnOnce(&mut LedgerStore) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn add_stock(
        &self,
        quantity: u64,
        manufacturer: &str,
        name: &str,
        id: &str,
        year: i16,
        month: u8,
    ) -> LedgerResult<()> {
        self.lock()
            .add_stock(quantity, manufacturer, name, id, year, month)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_stock_with_details(
        &self,
        quantity: u64,
        manufacturer: &str,
        name: &str,
        id: &str,
        year: i16,
        month: u8,
        free_text: &str,
    ) -> LedgerResult<()> {
        self.lock()
            .add_stock_with_details(quantity, manufacturer, name, id, year, month, free_text)
    }

    pub fn set_price(&self, id: &str, price: u64) -> LedgerResult<()> {
        self.lock().set_price(id, price)
    }

    pub fn sell(&self, quantity: u64, id: &str) -> LedgerResult<()> {
        self.lock().sell(quantity, id)
    }

    pub fn reserve(&self, quantity: u64, id: &str) -> LedgerResult<ReservationToken> {
        self.lock().reserve(quantity, id)
    }

    pub fn unreserve(&self, token: ReservationToken) -> LedgerResult<()> {
        self.lock().unreserve(token)
    }

    pub fn finalize_reservation(&self, token: ReservationToken) -> LedgerResult<()> {
        self.lock().finalize_reservation(token)
    }

    pub fn reset_sales_tracking(&self) {
        self.lock().reset_sales_tracking();
    }

    pub fn empty(&self) {
        self.lock().empty();
    }

    pub fn rename_identifier(&self, from: &str, to: &str) -> LedgerResult<()> {
        self.lock().rename_identifier(from, to)
    }

    pub fn total_units(&self) -> u64 {
        self.lock().total_units()
    }

    pub fn total_units_of(&self, id: &str) -> LedgerResult<u64> {
        self.lock().total_units_of(id)
    }

    pub fn reserved_units(&self) -> u64 {
        self.lock().reserved_units()
    }

    pub fn distinct_item_count(&self) -> usize {
        self.lock().distinct_item_count()
    }

    pub fn units_sold(&self) -> u64 {
        self.lock().units_sold()
    }

    pub fn units_sold_of(&self, id: &str) -> LedgerResult<u64> {
        self.lock().units_sold_of(id)
    }

    pub fn total_revenue(&self) -> u64 {
        self.lock().total_revenue()
    }

    pub fn revenue_of(&self, id: &str) -> LedgerResult<u64> {
        self.lock().revenue_of(id)
    }

    pub fn reserved_value(&self) -> u64 {
        self.lock().reserved_value()
    }

    pub fn details(&self, id: &str) -> LedgerResult<String> {
        self.lock().details(id).map(str::to_owned)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.lock().snapshot()
    }

    pub fn save<W: Write>(&self, sink: W) -> Result<(), SnapshotError> {
        snapshot::save(&self.lock(), sink)
    }

    pub fn load<R: Read>(&self, source: R) -> Result<(), SnapshotError> {
        snapshot::load(&mut self.lock(), source)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        snapshot::save_to_path(&self.lock(), path)
    }

    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        snapshot::load_from_path(&mut self.lock(), path)
    }

    /// Save to the configured snapshot path.
    pub fn persist(&self) -> Result<(), SnapshotError> {
        self.save_to_path(&self.snapshot_path)
    }

    /// Replace the contents with the snapshot at the configured path.
    pub fn reload(&self) -> Result<(), SnapshotError> {
        self.load_from_path(&self.snapshot_path)
    }
}
