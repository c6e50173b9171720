//! Request log records and the sinks that ship them off-box.
//!
//! Shipping is best-effort: callers log a failed `ship` and move on.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One handled request, as shipped to the log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogRecord {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub operation: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub latency_ms: f64,
    /// True for the first request served by this process.
    pub cold_start: bool,
}

impl RequestLogRecord {
    /// Stream partition key; records for one request stay together.
    pub fn partition_key(&self) -> String {
        self.request_id.to_string()
    }
}

#[derive(Debug, Error)]
pub enum LogShipError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Destination for request log records.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn ship(&self, record: &RequestLogRecord) -> Result<(), LogShipError>;
}

/// Sink used when no stream is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

#[async_trait]
impl LogSink for NoopLogSink {
    async fn ship(&self, _record: &RequestLogRecord) -> Result<(), LogShipError> {
        Ok(())
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryLogSink {
    inner: Mutex<Vec<RequestLogRecord>>,
}

impl InMemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RequestLogRecord> {
        self.inner.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LogSink for InMemoryLogSink {
    async fn ship(&self, record: &RequestLogRecord) -> Result<(), LogShipError> {
        self.inner
            .lock()
            .map_err(|e| LogShipError::Transport(e.to_string()))?
            .push(record.clone());
        Ok(())
    }
}
