use crate::errors::AppError;

/// Default Google Ads REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://googleads.googleapis.com";
/// Google Ads API version the service is pinned to.
pub const DEFAULT_API_VERSION: &str = "v16";
/// Google OAuth2 token endpoint used to exchange the refresh token.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Process-wide configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub credentials: ServerCredentials,
    pub google_ads: GoogleAdsEndpoints,
}

/// Google Ads credentials as read from the environment.
///
/// Each value is optional here so the server can boot and report an
/// incomplete configuration through `/health` instead of refusing to start.
#[derive(Clone, Default)]
pub struct ServerCredentials {
    pub developer_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    /// Manager account acting on behalf of the target customer.
    pub login_customer_id: Option<String>,
}

/// Credentials with every required value present.
#[derive(Clone)]
pub struct CompleteCredentials {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub login_customer_id: Option<String>,
}

/// Remote endpoints for the Google Ads and OAuth APIs.
#[derive(Debug, Clone)]
pub struct GoogleAdsEndpoints {
    pub api_base_url: String,
    pub api_version: String,
    pub token_url: String,
}

impl Default for GoogleAdsEndpoints {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Google Ads API: {}/{}",
            config.google_ads.api_base_url,
            config.google_ads.api_version
        );
        tracing::debug!("Server Port: {}", config.port);
        if !config.credentials.is_complete() {
            tracing::warn!(
                "⚠️  Google Ads credentials incomplete, /create-ad will answer 500 until they are set"
            );
            config.credentials.log_presence();
        }

        Ok(config)
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as absent. Only malformed server settings
    /// (port, endpoint URLs) are errors; missing credentials are not.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port: u16 = match non_blank("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => 3000,
        };

        let credentials = ServerCredentials {
            developer_token: non_blank("GOOGLE_ADS_DEVELOPER_TOKEN"),
            client_id: non_blank("GOOGLE_ADS_CLIENT_ID"),
            client_secret: non_blank("GOOGLE_ADS_CLIENT_SECRET"),
            refresh_token: non_blank("GOOGLE_ADS_REFRESH_TOKEN"),
            login_customer_id: non_blank("GOOGLE_ADS_LOGIN_CUSTOMER_ID"),
        };

        let google_ads = GoogleAdsEndpoints {
            api_base_url: validated_url(
                "GOOGLE_ADS_API_BASE_URL",
                non_blank("GOOGLE_ADS_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            )?,
            api_version: non_blank("GOOGLE_ADS_API_VERSION")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            token_url: validated_url(
                "GOOGLE_OAUTH_TOKEN_URL",
                non_blank("GOOGLE_OAUTH_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            )?,
        };

        Ok(Self {
            port,
            credentials,
            google_ads,
        })
    }
}

fn validated_url(name: &str, raw: String) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

impl ServerCredentials {
    /// True when the four values needed to call Google Ads are present.
    pub fn is_complete(&self) -> bool {
        self.developer_token.is_some()
            && self.client_id.is_some()
            && self.client_secret.is_some()
            && self.refresh_token.is_some()
    }

    /// True when all five values, including the login customer id, are present.
    ///
    /// This is what `/health` reports as `configured`.
    pub fn is_fully_configured(&self) -> bool {
        self.is_complete() && self.login_customer_id.is_some()
    }

    /// Returns the credentials needed for a remote call, or a configuration
    /// error if any required value is missing.
    pub fn require(&self) -> Result<CompleteCredentials, AppError> {
        match (
            &self.developer_token,
            &self.client_id,
            &self.client_secret,
            &self.refresh_token,
        ) {
            (Some(developer_token), Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Ok(CompleteCredentials {
                    developer_token: developer_token.clone(),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    refresh_token: refresh_token.clone(),
                    login_customer_id: self.login_customer_id.clone(),
                })
            }
            _ => {
                tracing::error!("❌ Google Ads credentials missing on the server");
                self.log_presence();
                Err(AppError::Configuration {
                    missing: self.missing_required(),
                })
            }
        }
    }

    /// Environment variable names of the required values that are absent.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("GOOGLE_ADS_DEVELOPER_TOKEN", self.developer_token.is_some()),
            ("GOOGLE_ADS_CLIENT_ID", self.client_id.is_some()),
            ("GOOGLE_ADS_CLIENT_SECRET", self.client_secret.is_some()),
            ("GOOGLE_ADS_REFRESH_TOKEN", self.refresh_token.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }

    fn log_presence(&self) {
        let mark = |value: &Option<String>| if value.is_some() { "✓" } else { "✗" };
        tracing::warn!(
            developer_token = mark(&self.developer_token),
            client_id = mark(&self.client_id),
            client_secret = mark(&self.client_secret),
            refresh_token = mark(&self.refresh_token),
            login_customer_id = mark(&self.login_customer_id),
            "Google Ads credential presence"
        );
    }
}

// Secrets must never reach logs through `{:?}`.
impl std::fmt::Debug for ServerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ServerCredentials")
            .field("developer_token", &redact(&self.developer_token))
            .field("client_id", &redact(&self.client_id))
            .field("client_secret", &redact(&self.client_secret))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}

impl std::fmt::Debug for CompleteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompleteCredentials")
            .field("developer_token", &"[REDACTED]")
            .field("client_id", &"[REDACTED]")
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}
