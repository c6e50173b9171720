//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, geocoder, verifier and log sink wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: error taxonomy and JSON error responses

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        verifier: services.verifier.clone(),
    };
    let telemetry_state = middleware::TelemetryState::new(services.log_sink.clone());

    // Telemetry wraps the fallbacks too, so 404s and 405s are recorded.
    Router::new()
        .route(
            "/health",
            get(routes::system::health).fallback(routes::system::method_not_allowed),
        )
        .merge(routes::items::router(auth_state))
        .fallback(routes::system::not_found)
        .layer(from_fn_with_state(
            telemetry_state,
            middleware::telemetry_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::cors_layer())
                .layer(Extension(services)),
        )
}
