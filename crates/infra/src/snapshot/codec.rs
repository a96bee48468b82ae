use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use stockledger_inventory::{LedgerSnapshot, LedgerStore};

use super::SnapshotError;

/// Write the store's three ledgers to `sink`, in order stock, reserved, sold.
pub fn save<W: Write>(store: &LedgerStore, mut sink: W) -> Result<(), SnapshotError> {
    write_block(&mut sink, store.stock())?;
    write_block(&mut sink, store.reservations())?;
    write_block(&mut sink, store.sales())?;
    sink.flush()?;

    info!(
        stock = store.stock().len(),
        reserved = store.reservations().len(),
        sold = store.sales().len(),
        "ledger snapshot saved"
    );
    Ok(())
}

/// Replace the store's contents with the snapshot read from `source`.
///
/// On failure the store is left empty.
pub fn load<R: Read>(store: &mut LedgerStore, mut source: R) -> Result<(), SnapshotError> {
    store.empty();

    let snapshot = match decode(&mut source) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "ledger snapshot load failed; store left empty");
            return Err(err);
        }
    };

    info!(
        stock = snapshot.stock.len(),
        reserved = snapshot.reserved.len(),
        sold = snapshot.sold.len(),
        "ledger snapshot loaded"
    );
    store.restore(snapshot);
    Ok(())
}

fn decode<R: Read>(source: &mut R) -> Result<LedgerSnapshot, SnapshotError> {
    let snapshot = LedgerSnapshot {
        stock: read_block(source)?,
        reserved: read_block(source)?,
        sold: read_block(source)?,
    };
    if let Some(violation) = snapshot.first_violation() {
        return Err(SnapshotError::Corrupt(violation));
    }
    Ok(snapshot)
}

fn write_block<W: Write, T: Serialize>(sink: &mut W, records: &[T]) -> Result<(), SnapshotError> {
    bincode::serialize_into(&mut *sink, &(records.len() as u64))?;
    for record in records {
        bincode::serialize_into(&mut *sink, record)?;
    }
    Ok(())
}

fn read_block<R: Read, T: DeserializeOwned>(source: &mut R) -> Result<Vec<T>, SnapshotError> {
    let count: u64 = bincode::deserialize_from(&mut *source)?;
    // The count is untrusted; grow as records actually decode.
    let mut records = Vec::new();
    for _ in 0..count {
        records.push(bincode::deserialize_from(&mut *source)?);
    }
    Ok(records)
}
