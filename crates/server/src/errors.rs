use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::observability;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error returned by every handler and middleware; renders `{"error": msg}`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn missing_token() -> Self {
        observability::record_auth_failure("missing_token");
        Self::new(StatusCode::UNAUTHORIZED, "Access token required")
    }

    pub fn invalid_token() -> Self {
        observability::record_auth_failure("invalid_token");
        Self::new(StatusCode::FORBIDDEN, "Invalid or expired token")
    }

    pub fn insufficient_role(message: &str) -> Self {
        observability::record_auth_failure("insufficient_role");
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, message) }

    /// Logs `detail` and hides it from the caller.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

impl From<AuthError> for JsonApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::DuplicateEmail => Self::validation(err.to_string()),
            AuthError::InvalidCredentials => {
                observability::record_auth_failure("invalid_credentials");
                Self::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AuthError::NotFound => Self::not_found(err.to_string()),
            other => {
                let code = other.code();
                error!(code, "auth workflow failed");
                Self::internal(other)
            }
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) | ServiceError::Duplicate(msg) => Self::validation(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Db(msg) => Self::internal(msg),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(format!("invalid path parameter: {}", rejection.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("demo data failed to load: {0}")]
    Seed(#[from] service::errors::ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_detail() {
        let err = JsonApiError::from(ServiceError::Db("relation \"products\" does not exist".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn typed_outcomes_map_to_statuses() {
        assert_eq!(JsonApiError::from(ServiceError::Duplicate("sku already exists".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(JsonApiError::from(ServiceError::not_found("customer")).status, StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::from(AuthError::DuplicateEmail).status, StatusCode::BAD_REQUEST);
        assert_eq!(JsonApiError::from(AuthError::InvalidCredentials).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::NotFound).status, StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::missing_token().status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::invalid_token().status, StatusCode::FORBIDDEN);
        assert_eq!(JsonApiError::insufficient_role("Admin access required").status, StatusCode::FORBIDDEN);
    }
}
