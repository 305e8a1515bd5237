//! Unified error handling with the `{ success, message, ... }` response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Consistent JSON envelope for all API responses.
///
/// The payload's fields are flattened next to `success` and `message`, so a
/// payload struct with a `bloodGroupData` field produces
/// `{ "success": true, "message": "...", "bloodGroupData": [...] }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload for responses that carry only `success` and `message`.
#[derive(Debug, Default, Serialize)]
pub struct NoPayload {}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(message: &str, payload: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            payload,
        })
    }
}

impl ApiResponse<NoPayload> {
    /// A successful response with nothing but a message.
    pub fn message(message: &str) -> Json<Self> {
        Self::success(message, NoPayload {})
    }
}

/// Error body: `{ success: false, message, error? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A failure reported under an endpoint-specific message, with the
    /// underlying error text exposed in the `error` field of the body.
    #[error("{message}: {source}")]
    Endpoint {
        message: &'static str,
        source: Box<AppError>,
    },
}

impl AppError {
    /// Shorthand for the bearer-token rejection used by the auth extractor.
    pub fn auth_failed() -> Self {
        Self::Unauthorized("Auth Failed".to_string())
    }

    /// Report this error under an endpoint-specific message.
    pub fn in_endpoint(self, message: &'static str) -> Self {
        Self::Endpoint {
            message,
            source: Box::new(self),
        }
    }

    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Endpoint { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error represents an auth failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Endpoint { source, .. } => source.status(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, error) = match &self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => (msg.clone(), None),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                ("An internal error occurred".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("An internal error occurred".to_string(), None)
            }
            AppError::Endpoint { message, source } => {
                tracing::error!(error = %source, endpoint = %message, "Request failed");
                (message.to_string(), Some(source.to_string()))
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            error,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Greeting {
        greeting: &'static str,
    }

    #[test]
    fn api_response_success_flattens_payload() {
        let response = ApiResponse::success("done", Greeting { greeting: "hello" });
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert_eq!(json["greeting"], "hello");
    }

    #[test]
    fn api_response_message_only() {
        let response = ApiResponse::message("Record Deleted successfully");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Record Deleted successfully" })
        );
    }

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("user".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert!(err.in_endpoint("lookup failed").is_not_found());
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("email is required".to_string());
        assert_eq!(err.to_string(), "Validation error: email is required");
    }

    #[test]
    fn app_error_from_sqlx() {
        let sqlx_err = sqlx::Error::RowNotFound;
        let err: AppError = sqlx_err.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn endpoint_error_keeps_source_status() {
        let db = AppError::from(sqlx::Error::RowNotFound).in_endpoint("Error in stats API");
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let forbidden = AppError::Forbidden("no".to_string()).in_endpoint("Error in stats API");
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn endpoint_error_display_includes_source() {
        let err = AppError::Internal("pool closed".to_string()).in_endpoint("Error in stats API");
        assert_eq!(err.to_string(), "Error in stats API: Internal error: pool closed");
    }
}
