//! Process-wide log setup for binaries and tests that use the ledger.

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;

/// Install the JSON subscriber with `RUST_LOG` filtering (default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with_default("info");
}
