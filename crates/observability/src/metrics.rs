//! API metrics: one latency/status data point per request.
//!
//! Metrics are emitted as structured events on the `metrics` target so the
//! log pipeline can route them separately from application logs.

use std::time::Duration;

use serde::Serialize;

/// Metric namespace shared by every data point.
pub const NAMESPACE: &str = "ItemsAPI";

/// The API operation a request was routed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    CreateItem,
    GetItems,
    GetItem,
    UpdateItem,
    DeleteItem,
    Health,
    Unknown,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateItem => "CreateItem",
            Operation::GetItems => "GetItems",
            Operation::GetItem => "GetItem",
            Operation::UpdateItem => "UpdateItem",
            Operation::DeleteItem => "DeleteItem",
            Operation::Health => "Health",
            Operation::Unknown => "Unknown",
        }
    }

    /// Map an HTTP method and matched route template to an operation.
    pub fn from_route(method: &str, route: &str) -> Self {
        match (method, route) {
            ("POST", "/items") => Operation::CreateItem,
            ("GET", "/items") => Operation::GetItems,
            ("GET", "/items/:id") => Operation::GetItem,
            ("PATCH", "/items/:id") => Operation::UpdateItem,
            ("DELETE", "/items/:id") => Operation::DeleteItem,
            ("GET", "/health") => Operation::Health,
            _ => Operation::Unknown,
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiMetric {
    pub namespace: &'static str,
    pub operation: Operation,
    pub status_code: u16,
    pub latency_ms: f64,
}

impl ApiMetric {
    pub fn new(operation: Operation, status_code: u16, latency: Duration) -> Self {
        Self {
            namespace: NAMESPACE,
            operation,
            status_code,
            latency_ms: latency.as_secs_f64() * 1000.0,
        }
    }

    pub fn emit(&self) {
        tracing::info!(
            target: "metrics",
            namespace = self.namespace,
            operation = self.operation.as_str(),
            status_code = self.status_code,
            latency_ms = self.latency_ms,
            "api request"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_map_to_operations() {
        assert_eq!(Operation::from_route("POST", "/items"), Operation::CreateItem);
        assert_eq!(Operation::from_route("GET", "/items"), Operation::GetItems);
        assert_eq!(Operation::from_route("GET", "/items/:id"), Operation::GetItem);
        assert_eq!(Operation::from_route("PATCH", "/items/:id"), Operation::UpdateItem);
        assert_eq!(Operation::from_route("DELETE", "/items/:id"), Operation::DeleteItem);
        assert_eq!(Operation::from_route("PUT", "/items/:id"), Operation::Unknown);
    }

    #[test]
    fn latency_is_reported_in_milliseconds() {
        let metric = ApiMetric::new(Operation::GetItem, 200, Duration::from_micros(1500));
        assert!((metric.latency_ms - 1.5).abs() < 1e-9);
        assert_eq!(metric.namespace, "ItemsAPI");
    }
}
