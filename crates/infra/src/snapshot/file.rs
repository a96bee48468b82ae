use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use stockledger_inventory::LedgerStore;

use super::{SnapshotError, codec};

/// Save to `path`, replacing it only once the whole snapshot is on disk.
pub fn save_to_path(store: &LedgerStore, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let staging = staging_path(path);

    let result = write_staged(store, &staging).and_then(|()| {
        fs::rename(&staging, path)?;
        Ok(())
    });
    if result.is_err() {
        // Best effort; the write error is what the caller needs.
        let _ = fs::remove_file(&staging);
    }
    result?;

    debug!(path = %path.display(), "snapshot file written");
    Ok(())
}

/// Load from `path`; on failure the store is left empty.
pub fn load_from_path(store: &mut LedgerStore, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            store.empty();
            return Err(err.into());
        }
    };
    codec::load(store, BufReader::new(file))?;

    debug!(path = %path.display(), "snapshot file read");
    Ok(())
}

fn write_staged(store: &LedgerStore, staging: &Path) -> Result<(), SnapshotError> {
    let mut writer = BufWriter::new(File::create(staging)?);
    codec::save(store, &mut writer)?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| SnapshotError::Io(err.into_error()))?
        .sync_all()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
