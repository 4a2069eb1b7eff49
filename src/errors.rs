use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::google_ads_client::RemoteApiError;
use crate::validation::ValidationError;

/// Remediation hint attached to configuration failures.
pub const CONFIGURATION_HINT: &str =
    "Check that the GOOGLE_ADS_* environment variables are set on the server";
/// Remediation hint attached to remote failures.
pub const REMOTE_API_HINT: &str =
    "Check that the credentials are correct and that the account has the required permissions";

/// Application-specific error types.
///
/// Every variant renders as a JSON body with `success: false`, so no error
/// ever reaches the transport unhandled.
#[derive(Debug)]
pub enum AppError {
    /// The payload broke a field presence, count or length rule.
    Validation(ValidationError),
    /// The body could not be read as a JSON object.
    BadRequest(String),
    /// Required Google Ads credentials are missing on the server.
    Configuration {
        /// Environment variable names that are unset.
        missing: Vec<&'static str>,
    },
    /// Google Ads (or its OAuth endpoint) rejected or failed the call.
    RemoteApi(RemoteApiError),
    /// The body exceeds the configured size limit.
    PayloadTooLarge,
    /// The route does not accept this method.
    MethodNotAllowed {
        /// Value of the `Allow` header.
        allowed: &'static str,
    },
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "Validation error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Configuration { missing } => {
                write!(f, "Configuration error: missing {}", missing.join(", "))
            }
            AppError::RemoteApi(e) => write!(f, "Google Ads API error: {}", e),
            AppError::PayloadTooLarge => write!(f, "Payload too large"),
            AppError::MethodNotAllowed { allowed } => {
                write!(f, "Method not allowed (allowed: {})", allowed)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Client errors are logged at `warn`, server-side failures at `error`.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(e) => {
                tracing::warn!("❌ Validation failed: {}", e);
                (StatusCode::BAD_REQUEST, Json(e.to_body())).into_response()
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("❌ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "error": "Invalid JSON body",
                        "code": "BadRequest",
                        "detail": msg,
                    })),
                )
                    .into_response()
            }
            AppError::Configuration { missing } => {
                tracing::error!("❌ Server configuration incomplete: {:?}", missing);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Server configuration incomplete",
                        "code": "ConfigurationError",
                        "hint": CONFIGURATION_HINT,
                    })),
                )
                    .into_response()
            }
            AppError::RemoteApi(e) => {
                tracing::error!("❌ Error creating ad ({}): {}", e.kind.as_str(), e.message);
                let details = if e.sub_errors.is_empty() {
                    serde_json::Value::Null
                } else {
                    json!(e.sub_errors)
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": e.message,
                        "code": "RemoteApiError",
                        "errorType": e.kind.as_str(),
                        "details": details,
                        "hint": REMOTE_API_HINT,
                    })),
                )
                    .into_response()
            }
            AppError::PayloadTooLarge => {
                tracing::warn!("❌ Request body too large");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({
                        "success": false,
                        "error": "Request body too large",
                        "code": "PayloadTooLarge",
                    })),
                )
                    .into_response()
            }
            AppError::MethodNotAllowed { allowed } => {
                let use_method = allowed
                    .split(", ")
                    .find(|m| *m != "OPTIONS")
                    .unwrap_or(allowed);
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, allowed)],
                    Json(json!({
                        "success": false,
                        "error": format!("Method not allowed. Use {}.", use_method),
                    })),
                )
                    .into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Internal server error",
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<ValidationError> for AppError {
    /// Converts a `ValidationError` into an `AppError`.
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<RemoteApiError> for AppError {
    /// Converts a `RemoteApiError` into an `AppError`.
    fn from(err: RemoteApiError) -> Self {
        AppError::RemoteApi(err)
    }
}
