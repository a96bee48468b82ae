//! Domain events.

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - produced only by accepted commands
/// - named by a stable string, used in logs
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "ledger.stock.added").
    fn event_type(&self) -> &'static str;
}
