use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use geoitems_auth::{AuthError, TokenVerifier};
use geoitems_observability::tracing::SERVICE_NAME;
use geoitems_observability::{ApiMetric, LogSink, Operation, RequestLogRecord};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: TokenVerifier,
}

/// Reject the request unless it carries a valid bearer token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AuthError::MalformedHeader)?
                .to_owned(),
        ),
        None => None,
    };

    let claims = match state.verifier.verify_header(header.as_deref()).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!("authentication failed: {e}");
            return Err(e.into());
        }
    };

    req.extensions_mut()
        .insert(PrincipalContext::from_claims(&claims));

    Ok(next.run(req).await)
}

#[derive(Clone)]
pub struct TelemetryState {
    log_sink: Arc<dyn LogSink>,
    served: Arc<AtomicBool>,
}

impl TelemetryState {
    pub fn new(log_sink: Arc<dyn LogSink>) -> Self {
        Self {
            log_sink,
            served: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Run the request in a span, emit its metric and ship its log record.
pub async fn telemetry_middleware(
    State(state): State<TelemetryState>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let request_id = Uuid::now_v7();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let operation = Operation::from_route(&method, &route);
    let cold_start = !state.served.swap(true, Ordering::Relaxed);

    let span = info_span!(
        "request",
        service = SERVICE_NAME,
        operation = %operation,
        request_id = %request_id,
    );
    let response = next.run(req).instrument(span).await;

    let latency = started.elapsed();
    let status = response.status().as_u16();
    let metric = ApiMetric::new(operation, status, latency);
    metric.emit();

    let record = RequestLogRecord {
        request_id,
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        operation: operation.to_string(),
        method,
        path,
        status_code: status,
        latency_ms: metric.latency_ms,
        cold_start,
    };
    let sink = state.log_sink.clone();
    tokio::spawn(async move {
        if let Err(e) = sink.ship(&record).await {
            warn!(request_id = %record.request_id, "failed to ship request log: {e}");
        }
    });

    response
}

/// Any origin may call the API with any method. Preflight requests are
/// answered here, before authentication runs.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
