//! Tracing, logging, metrics and log shipping (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Per-request API metrics.
pub mod metrics;

/// Request log records and the sinks they are shipped to.
pub mod shipping;

pub use metrics::{ApiMetric, Operation};
pub use shipping::{InMemoryLogSink, LogShipError, LogSink, NoopLogSink, RequestLogRecord};
