use crate::ad_models::{AdCreationResult, CreateAdPayload};
use crate::config::Config;
use crate::errors::AppError;
use crate::google_ads_client::AdPlatformClient;
use crate::validation::validate_payload;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded once at startup.
    pub config: Arc<Config>,
    /// Remote ad platform the create-ad handler forwards to.
    pub ads_client: Arc<dyn AdPlatformClient>,
}

impl AppState {
    pub fn new(config: Config, ads_client: Arc<dyn AdPlatformClient>) -> Self {
        Self {
            config: Arc::new(config),
            ads_client,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Whether all five Google Ads values are configured.
    pub configured: bool,
    pub endpoints: HealthEndpoints,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEndpoints {
    pub health: &'static str,
    pub create_ad: &'static str,
}

/// GET /health
///
/// Reports configuration presence. Never calls Google Ads and never fails.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "Google Ads Backend API",
        version: env!("CARGO_PKG_VERSION"),
        configured: state.config.credentials.is_fully_configured(),
        endpoints: HealthEndpoints {
            health: "/api/health",
            create_ad: "/api/create-ad (POST)",
        },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// POST /create-ad
///
/// Flow:
/// 1. Parse the body (an empty body counts as `{}`, anything but an object is rejected).
/// 2. Validate fields, counts and lengths.
/// 3. Require complete server credentials.
/// 4. Create the ad, paused, with a single remote call.
///
/// Every failure is terminal and answered by [`AppError`]; nothing is retried.
pub async fn create_ad(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AdCreationResult>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;
    let payload = parse_payload(&body)?;

    tracing::info!(
        "📥 Create-ad request received for customer: {}",
        describe_id(payload.customer_id.as_ref())
    );

    let request = validate_payload(&payload)?;

    let credentials = state.config.credentials.require()?;

    tracing::info!(
        "📊 Customer: {}, Ad Group: {}, Headlines: {}, Descriptions: {}",
        request.customer_id,
        request.ad_group_id,
        request.headlines.len(),
        request.descriptions.len()
    );

    let resource_name = state.ads_client.create_ad(&credentials, &request).await?;

    tracing::info!("✅ Ad created successfully: {}", resource_name);

    Ok(Json(AdCreationResult::new(&request, resource_name)))
}

fn parse_payload(body: &[u8]) -> Result<CreateAdPayload, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateAdPayload::default());
    }

    // Derived Deserialize also accepts arrays and fills fields by position
    let value: Value =
        serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Log-friendly form of a raw id: strings unquoted, numbers as-is.
fn describe_id(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => "<invalid>".to_string(),
        None => "<none>".to_string(),
    }
}

pub async fn create_ad_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed {
        allowed: "POST, OPTIONS",
    }
}

pub async fn health_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed {
        allowed: "GET, OPTIONS",
    }
}
