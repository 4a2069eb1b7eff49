use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ad_models::{strip_dashes, AdCreationRequest, MutateAdGroupAdsRequest};
use crate::config::{CompleteCredentials, GoogleAdsEndpoints};
use crate::errors::AppError;

/// Returned when the create response does not carry a resource name.
pub const UNKNOWN_RESOURCE_NAME: &str = "unknown";

/// The remote ad platform as seen by the create-ad handler.
///
/// One call creates one ad and returns its resource name.
#[async_trait]
pub trait AdPlatformClient: Send + Sync {
    async fn create_ad(
        &self,
        credentials: &CompleteCredentials,
        request: &AdCreationRequest,
    ) -> Result<String, RemoteApiError>;
}

/// Which step of the remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Refresh token exchange was refused.
    OAuth,
    /// Google Ads answered with an error envelope.
    GoogleAdsFailure,
    /// The request never got a response.
    Transport,
    /// A success response could not be read.
    InvalidResponse,
}

impl RemoteErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorKind::OAuth => "OAuthError",
            RemoteErrorKind::GoogleAdsFailure => "GoogleAdsFailure",
            RemoteErrorKind::Transport => "TransportError",
            RemoteErrorKind::InvalidResponse => "InvalidResponse",
        }
    }
}

/// One entry of a `GoogleAdsFailure.errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSubError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<Value>,
}

/// Failure of the remote create call.
///
/// When Google Ads reports individual errors, `message` is their messages
/// joined with `", "`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RemoteApiError {
    pub kind: RemoteErrorKind,
    pub message: String,
    pub sub_errors: Vec<RemoteSubError>,
}

impl RemoteApiError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sub_errors: Vec::new(),
        }
    }

    /// Builds the error from a Google API error body.
    ///
    /// Sub-errors are read from `error.details[].errors[]` (the REST
    /// envelope) or from a top-level `errors[]` list.
    pub fn from_error_body(kind: RemoteErrorKind, status: u16, body: &Value) -> Self {
        let sub_errors = collect_sub_errors(body);

        let message = if !sub_errors.is_empty() {
            sub_errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            top_level_message(body)
                .unwrap_or_else(|| format!("Google Ads API returned status {}", status))
        };

        Self {
            kind,
            message,
            sub_errors,
        }
    }
}

fn collect_sub_errors(body: &Value) -> Vec<RemoteSubError> {
    let nested = body
        .pointer("/error/details")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|detail| detail.get("errors").and_then(Value::as_array))
        .flatten();
    let top_level = body
        .get("errors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();

    nested
        .chain(top_level)
        .filter_map(|entry| {
            let error_code = entry.get("errorCode").cloned();
            let message = entry
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| error_code.as_ref().map(|code| code.to_string()))?;
            Some(RemoteSubError {
                message,
                error_code,
            })
        })
        .collect()
}

fn top_level_message(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::Object(error)) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        // OAuth endpoints answer `{"error": "invalid_grant", "error_description": "..."}`
        Some(Value::String(code)) => Some(
            match body.get("error_description").and_then(Value::as_str) {
                Some(description) => format!("{}: {}", code, description),
                None => code.clone(),
            },
        ),
        _ => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Reads the created ad's resource name from a mutate response.
///
/// The REST API answers `{"results": [{"resourceName": ...}]}`. A bare
/// array of results is accepted too, and either key casing. Anything else
/// yields [`UNKNOWN_RESOURCE_NAME`] rather than failing an ad that was
/// already created.
pub fn extract_resource_name(response: &Value) -> String {
    let first = response
        .get("results")
        .and_then(|results| results.get(0))
        .or_else(|| response.get(0));

    first
        .and_then(|result| {
            result
                .get("resourceName")
                .or_else(|| result.get("resource_name"))
        })
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_RESOURCE_NAME)
        .to_string()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the Google Ads REST API.
#[derive(Clone)]
pub struct GoogleAdsClient {
    client: reqwest::Client,
    endpoints: GoogleAdsEndpoints,
}

impl GoogleAdsClient {
    /// Creates a new `GoogleAdsClient`.
    ///
    /// No request timeout is set; calls wait as long as the transport does.
    pub fn new(endpoints: GoogleAdsEndpoints) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("google-ads-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to create Google Ads client: {}", e))
            })?;

        Ok(Self { client, endpoints })
    }

    /// Exchanges the refresh token for a short-lived access token.
    async fn fetch_access_token(
        &self,
        credentials: &CompleteCredentials,
    ) -> Result<String, RemoteApiError> {
        tracing::debug!("Refreshing OAuth access token");

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                RemoteApiError::new(
                    RemoteErrorKind::Transport,
                    format!("OAuth token request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = read_error_body(response).await;
            tracing::error!("OAuth token endpoint returned {}", status);
            return Err(RemoteApiError::from_error_body(
                RemoteErrorKind::OAuth,
                status.as_u16(),
                &body,
            ));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            RemoteApiError::new(
                RemoteErrorKind::OAuth,
                format!("Failed to parse OAuth token response: {}", e),
            )
        })?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl AdPlatformClient for GoogleAdsClient {
    async fn create_ad(
        &self,
        credentials: &CompleteCredentials,
        request: &AdCreationRequest,
    ) -> Result<String, RemoteApiError> {
        let access_token = self.fetch_access_token(credentials).await?;

        let url = format!(
            "{}/{}/customers/{}/adGroupAds:mutate",
            self.endpoints.api_base_url,
            self.endpoints.api_version,
            request.normalized_customer_id()
        );
        let body = MutateAdGroupAdsRequest {
            operations: vec![request.to_operation()],
        };

        tracing::info!("🚀 Sending adGroupAds:mutate to Google Ads: {}", url);

        let mut call = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .header("developer-token", credentials.developer_token.as_str())
            .json(&body);
        if let Some(login_customer_id) = &credentials.login_customer_id {
            call = call.header("login-customer-id", strip_dashes(login_customer_id));
        }

        let response = call.send().await.map_err(|e| {
            RemoteApiError::new(
                RemoteErrorKind::Transport,
                format!("Google Ads request failed: {}", e),
            )
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = read_error_body(response).await;
            tracing::error!("Google Ads returned {}: {}", status, body);
            return Err(RemoteApiError::from_error_body(
                RemoteErrorKind::GoogleAdsFailure,
                status.as_u16(),
                &body,
            ));
        }

        let response_data: Value = response.json().await.map_err(|e| {
            RemoteApiError::new(
                RemoteErrorKind::InvalidResponse,
                format!("Failed to parse Google Ads response: {}", e),
            )
        })?;
        tracing::debug!("Google Ads response: {}", response_data);

        let resource_name = extract_resource_name(&response_data);
        if resource_name == UNKNOWN_RESOURCE_NAME {
            tracing::warn!("Unexpected Google Ads response format: {:?}", response_data);
        }

        Ok(resource_name)
    }
}

/// Error bodies are JSON in the normal case; anything else becomes
/// `{"message": <text>}`.
async fn read_error_body(response: reqwest::Response) -> Value {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "message": text }))
}
