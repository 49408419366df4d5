//! Error types for clipflow-qd
//!
//! One enum covers the full error taxonomy of the dispatch service.
//! `IntoResponse` maps every variant onto the shared JSON envelope with a
//! stable machine code, so handlers can simply return `Result<_, Error>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clipflow_common::api::ApiResponse;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Main error type for the dispatch service
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid bearer credential
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Actor is not allowed to act as the requested role
    #[error("Role mismatch: {0}")]
    RoleMismatch(String),

    /// Actor does not hold a live claim for the item
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Contention loss: another actor holds a non-expired claim. The holder
    /// is None when a concurrent release cleared the row before it could be
    /// observed.
    #[error("Item is already claimed")]
    AlreadyClaimed { claimed_by: Option<String> },

    /// Empty eligible set for dispatch. Carries the lapse flag because an
    /// expired previous assignment is released before selection runs.
    #[error("No work available")]
    NoWorkAvailable { previous_expired: bool },

    /// Actor's plan does not permit auto-dispatch
    #[error("Subscription required")]
    SubscriptionRequired,

    /// Missing or invalid payload field; nothing was mutated
    #[error("Validation error: {message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors bubbled up from the common library
    #[error(transparent)]
    Common(#[from] clipflow_common::Error),
}

/// Convenience Result type using clipflow-qd Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Missing-field validation error, named after the field
    pub fn missing_field(field: &'static str) -> Self {
        Error::Validation {
            field: Some(field),
            message: format!("Missing required field: {}", field),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::error("AUTHENTICATION_REQUIRED", "Authentication required"),
            ),
            Error::RoleMismatch(msg) => (
                StatusCode::FORBIDDEN,
                ApiResponse::error("ROLE_MISMATCH", msg),
            ),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiResponse::error("FORBIDDEN", msg)),
            Error::AlreadyClaimed { claimed_by } => {
                let resp = match claimed_by {
                    Some(holder) => ApiResponse::error_with_details(
                        "ALREADY_CLAIMED",
                        "Item is claimed by another actor",
                        json!({ "claimed_by": holder }),
                    ),
                    None => ApiResponse::error("ALREADY_CLAIMED", "Item is claimed by another actor"),
                };
                (StatusCode::CONFLICT, resp)
            }
            Error::NoWorkAvailable { previous_expired } => {
                let resp = if previous_expired {
                    ApiResponse::error_with_details(
                        "NO_WORK_AVAILABLE",
                        "No eligible work items",
                        json!({ "previous_expired": true }),
                    )
                } else {
                    ApiResponse::error("NO_WORK_AVAILABLE", "No eligible work items")
                };
                (StatusCode::NOT_FOUND, resp)
            }
            Error::SubscriptionRequired => (
                StatusCode::PAYMENT_REQUIRED,
                ApiResponse::error("SUBSCRIPTION_REQUIRED", "An active subscription is required"),
            ),
            Error::Validation { field, message } => {
                let resp = match field {
                    Some(f) => ApiResponse::error_with_details(
                        "VALIDATION_ERROR",
                        message,
                        json!({ "field": f }),
                    ),
                    None => ApiResponse::error("VALIDATION_ERROR", message),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, resp)
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::error("NOT_FOUND", msg)),
            Error::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiResponse::error("BAD_REQUEST", msg))
            }
            Error::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("INTERNAL", "Internal server error"),
                )
            }
            Error::Serialization(e) => {
                error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("INTERNAL", "Internal server error"),
                )
            }
            Error::Common(e) => {
                error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("INTERNAL", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn render(err: Error) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn already_claimed_names_holder_when_known() {
        let err = Error::AlreadyClaimed {
            claimed_by: Some("actor-1".to_string()),
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_CLAIMED");
        assert_eq!(body["details"]["claimed_by"], "actor-1");
    }

    #[tokio::test]
    async fn already_claimed_omits_details_for_unobserved_holder() {
        let err = Error::AlreadyClaimed { claimed_by: None };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_CLAIMED");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn no_work_carries_lapse_flag() {
        let err = Error::NoWorkAvailable {
            previous_expired: true,
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NO_WORK_AVAILABLE");
        assert_eq!(body["details"]["previous_expired"], true);

        let err = Error::NoWorkAvailable {
            previous_expired: false,
        };
        let (_, body) = render(err).await;
        assert!(body.get("details").is_none());
    }
}
