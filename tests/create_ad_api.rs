/// End-to-end tests of the HTTP surface with a recording ad client
/// Exercises validation, configuration and remote error handling without network access
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use google_ads_backend::ad_models::AdCreationRequest;
use google_ads_backend::config::{CompleteCredentials, Config};
use google_ads_backend::google_ads_client::{
    AdPlatformClient, RemoteApiError, RemoteErrorKind, UNKNOWN_RESOURCE_NAME,
};
use google_ads_backend::handlers::AppState;
use google_ads_backend::routes::create_router;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Records every call and answers with a canned result.
struct RecordingClient {
    calls: AtomicUsize,
    last_request: Mutex<Option<AdCreationRequest>>,
    last_login_customer_id: Mutex<Option<String>>,
    outcome: Result<String, RemoteApiError>,
}

impl RecordingClient {
    fn answering(outcome: Result<String, RemoteApiError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_login_customer_id: Mutex::new(None),
            outcome,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdPlatformClient for RecordingClient {
    async fn create_ad(
        &self,
        credentials: &CompleteCredentials,
        request: &AdCreationRequest,
    ) -> Result<String, RemoteApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        *self.last_login_customer_id.lock().unwrap() = credentials.login_customer_id.clone();
        self.outcome.clone()
    }
}

const ALL_FIVE: &[(&str, &str)] = &[
    ("GOOGLE_ADS_DEVELOPER_TOKEN", "dev-token"),
    ("GOOGLE_ADS_CLIENT_ID", "client-id"),
    ("GOOGLE_ADS_CLIENT_SECRET", "client-secret"),
    ("GOOGLE_ADS_REFRESH_TOKEN", "refresh-token"),
    ("GOOGLE_ADS_LOGIN_CUSTOMER_ID", "111-222-3333"),
];

fn config_with(pairs: &[(&str, &str)]) -> Config {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| {
        owned
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

fn app(config: Config, client: Arc<RecordingClient>) -> Router {
    create_router(Arc::new(AppState::new(config, client)))
}

fn valid_body() -> Value {
    json!({
        "customerId": "123",
        "adGroupId": "456",
        "headlines": ["A", "B", "C"],
        "descriptions": ["D1", "D2"],
        "finalUrl": "https://x.com"
    })
}

async fn post_create_ad(app: Router, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/create-ad")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "https://ads.example.com")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_valid_request_creates_one_paused_ad() {
    let client = RecordingClient::answering(Ok("customers/123/adGroupAds/456~789".to_string()));
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client.clone()), &valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["resourceName"], "customers/123/adGroupAds/456~789");
    assert_eq!(body["details"]["customerId"], "123");
    assert_eq!(body["details"]["adGroupId"], "456");
    assert_eq!(body["details"]["headlinesCount"], 3);
    assert_eq!(body["details"]["descriptionsCount"], 2);
    assert_eq!(body["details"]["status"], "PAUSED");

    assert_eq!(client.calls(), 1);
    let request = client.last_request.lock().unwrap().clone().unwrap();
    let operation = serde_json::to_value(request.to_operation()).unwrap();
    assert_eq!(operation["create"]["status"], "PAUSED");
    assert_eq!(operation["create"]["adGroup"], "customers/123/adGroups/456");
    assert_eq!(
        client.last_login_customer_id.lock().unwrap().as_deref(),
        Some("111-222-3333")
    );
}

#[tokio::test]
async fn test_unknown_resource_name_is_passed_through() {
    let client = RecordingClient::answering(Ok(UNKNOWN_RESOURCE_NAME.to_string()));
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client), &valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resourceName"], "unknown");
}

#[tokio::test]
async fn test_login_customer_id_is_not_required_to_create() {
    let client = RecordingClient::answering(Ok("customers/123/adGroupAds/1~2".to_string()));
    let (status, _) =
        post_create_ad(app(config_with(&ALL_FIVE[..4]), client.clone()), &valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(client.calls(), 1);
    assert!(client.last_login_customer_id.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_missing_fields_are_listed() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let (status, body) = post_create_ad(
        app(config_with(ALL_FIVE), client.clone()),
        &json!({"customerId": "123", "headlines": ["A", "B", "C"]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "MissingFields");
    assert_eq!(body["missing"], json!(["adGroupId", "descriptions", "finalUrl"]));
    assert_eq!(
        body["required"],
        json!(["customerId", "adGroupId", "headlines", "descriptions", "finalUrl"])
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_empty_body_reports_missing_fields() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let (status, body) = send(
        app(config_with(ALL_FIVE), client),
        Request::builder()
            .method(Method::POST)
            .uri("/create-ad")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MissingFields");
    assert_eq!(body["missing"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let (status, body) = send(
        app(config_with(ALL_FIVE), client.clone()),
        Request::builder()
            .method(Method::POST)
            .uri("/create-ad")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"customerId\": "))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid JSON body");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_positional_array_body_is_400_without_remote_call() {
    let client = RecordingClient::answering(Ok("customers/123/adGroupAds/1~2".to_string()));
    let array = json!(["123", "456", ["A", "B", "C"], ["D1", "D2"], "https://x.com"]);
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client.clone()), &array).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BadRequest");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let padding = "x".repeat(google_ads_backend::routes::MAX_BODY_BYTES);
    let mut request = valid_body();
    request["padding"] = json!(padding);
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client.clone()), &request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "PayloadTooLarge");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_two_headlines_is_rejected() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let mut request = valid_body();
    request["headlines"] = json!(["A", "B"]);
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client.clone()), &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidHeadlineCount");
    assert_eq!(body["received"], 2);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_long_headline_reports_index_and_length() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let long = "H".repeat(31);
    let mut request = valid_body();
    request["headlines"] = json!(["A", long.clone(), "C"]);
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client), &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "HeadlineTooLong");
    assert_eq!(body["index"], 2);
    assert_eq!(body["title"], long);
    assert_eq!(body["length"], 31);
}

#[tokio::test]
async fn test_validation_runs_before_configuration_check() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let mut request = valid_body();
    request["descriptions"] = json!(["only one"]);
    let (status, body) = post_create_ad(app(config_with(&[]), client), &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidDescriptionCount");
    assert_eq!(body["received"], 1);
}

#[tokio::test]
async fn test_incomplete_configuration_never_calls_remote() {
    for skipped in 0..4 {
        let pairs: Vec<(&str, &str)> = ALL_FIVE
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skipped)
            .map(|(_, pair)| *pair)
            .collect();
        let client = RecordingClient::answering(Ok("unused".to_string()));
        let (status, body) = post_create_ad(app(config_with(&pairs), client.clone()), &valid_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "ConfigurationError");
        assert!(body["hint"].is_string());
        assert_eq!(client.calls(), 0);
    }
}

#[tokio::test]
async fn test_remote_sub_errors_become_the_error_message() {
    let client = RecordingClient::answering(Err(RemoteApiError::from_error_body(
        RemoteErrorKind::GoogleAdsFailure,
        400,
        &json!({"errors": [{"message": "INVALID_CUSTOMER_ID"}]}),
    )));
    let (status, body) = post_create_ad(app(config_with(ALL_FIVE), client.clone()), &valid_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVALID_CUSTOMER_ID");
    assert_eq!(body["details"][0]["message"], "INVALID_CUSTOMER_ID");
    assert!(body["hint"].is_string());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_responses_carry_cors_headers() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let response = app(config_with(ALL_FIVE), client)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/create-ad")
                .header(header::ORIGIN, "https://ads.example.com")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_preflight_is_empty_200_with_cors_headers() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let response = app(config_with(ALL_FIVE), client.clone())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/create-ad")
                .header(header::ORIGIN, "https://ads.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_get_on_create_ad_is_405() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let (status, body) = send(
        app(config_with(ALL_FIVE), client.clone()),
        Request::builder()
            .method(Method::GET)
            .uri("/api/create-ad")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Method not allowed. Use POST.");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_health_reports_configured_when_all_five_are_set() {
    let client = RecordingClient::answering(Ok("unused".to_string()));
    let (status, body) = send(
        app(config_with(ALL_FIVE), client.clone()),
        Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "Google Ads Backend API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["configured"], true);
    assert_eq!(body["endpoints"]["health"], "/api/health");
    assert_eq!(body["endpoints"]["createAd"], "/api/create-ad (POST)");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_health_reports_unconfigured_when_any_value_is_missing() {
    for skipped in 0..ALL_FIVE.len() {
        let pairs: Vec<(&str, &str)> = ALL_FIVE
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skipped)
            .map(|(_, pair)| *pair)
            .collect();
        let client = RecordingClient::answering(Ok("unused".to_string()));
        let (status, body) = send(
            app(config_with(&pairs), client.clone()),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], false);
        assert_eq!(client.calls(), 0);
    }
}
