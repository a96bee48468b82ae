//! Configuration loading and representation.
//!
//! Read from the environment, with defaults for everything:
//!
//! - `STOCKLEDGER_SNAPSHOT_PATH`: snapshot file (default `stockledger.snapshot`)
//! - `STOCKLEDGER_TOKEN_SEED`: optional `u64` seed for reproducible reservation tokens

use std::path::PathBuf;

use tracing::warn;

use stockledger_inventory::{LedgerStore, RandomTokenSource};

pub const SNAPSHOT_PATH_VAR: &str = "STOCKLEDGER_SNAPSHOT_PATH";
pub const TOKEN_SEED_VAR: &str = "STOCKLEDGER_TOKEN_SEED";
pub const DEFAULT_SNAPSHOT_PATH: &str = "stockledger.snapshot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub snapshot_path: PathBuf,
    /// `None` draws tokens from OS entropy.
    pub token_seed: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            token_seed: None,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let snapshot_path = lookup(SNAPSHOT_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        let token_seed = lookup(TOKEN_SEED_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(err) => {
                warn!(value = %raw, error = %err, "STOCKLEDGER_TOKEN_SEED is not a u64; using entropy");
                None
            }
        });

        Self {
            snapshot_path,
            token_seed,
        }
    }

    /// Empty store with the configured token source.
    pub fn build_store(&self) -> LedgerStore {
        match self.token_seed {
            Some(seed) => LedgerStore::with_token_source(RandomTokenSource::seeded(seed)),
            None => LedgerStore::new(),
        }
    }
}
