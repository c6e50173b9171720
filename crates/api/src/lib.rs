//! HTTP API: routing, auth and telemetry middleware, request/response mapping.

pub mod app;
pub mod context;
pub mod middleware;
