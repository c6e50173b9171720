use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use geoitems_auth::AuthError;
use geoitems_core::{DomainError, ValidationError};
use geoitems_infra::StoreError;

/// Every way a request can fail, each with a fixed status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("Item not found")]
    NotFound,

    #[error("{0}")]
    Unhandled(String),
}

impl ApiError {
    pub fn invalid_postcode() -> Self {
        ApiError::Validation("Invalid postcode".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(e) => e.into(),
            // An id that is not a UUID cannot name a stored item.
            DomainError::InvalidId(_) => ApiError::NotFound,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Unhandled(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unhandled(msg) = &self {
            error!("unhandled error: {msg}");
        }
        json_error(self.status(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoitems_core::ItemId;

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(ApiError::from(AuthError::NoAuthHeader).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(ValidationError::EmptyUpdate).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::NotFound(ItemId::new())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::Backend("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_messages_are_prefixed() {
        let err = ApiError::from(AuthError::NoAuthHeader);
        assert_eq!(
            err.to_string(),
            "Authentication failed: No Authorization header present"
        );
    }

    #[test]
    fn malformed_ids_read_as_not_found() {
        let err: ApiError = "not-a-uuid".parse::<ItemId>().unwrap_err().into();
        assert!(matches!(err, ApiError::NotFound));
    }
}
