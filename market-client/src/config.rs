// market-client/src/config.rs

//! Client configuration

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the marketplace backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://portal.example.com/api")
    pub base_url: String,

    /// Bearer token issued by the identity provider
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from the environment
    ///
    /// A `.env` file in the working directory is read first, if present.
    ///
    /// | Variable                   | Default                  |
    /// |----------------------------|--------------------------|
    /// | `MARKETPLACE_API_URL`      | `http://localhost:9090`  |
    /// | `MARKETPLACE_TOKEN`        | unset                    |
    /// | `MARKETPLACE_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: var("MARKETPLACE_API_URL").unwrap_or_else(|| "http://localhost:9090".into()),
            token: var("MARKETPLACE_TOKEN").filter(|t| !t.is_empty()),
            timeout: var("MARKETPLACE_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:9090")
    }
}
