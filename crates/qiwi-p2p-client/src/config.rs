//! Client configuration.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::ClientError;

/// Bills endpoint; the bill id (and `/reject`) is appended verbatim.
pub const DEFAULT_API_BASE_URL: &str = "https://api.qiwi.com/partner/bill/v1/bills/";

/// Hosted payment form endpoint.
pub const DEFAULT_OPLATA_URL: &str = "https://oplata.qiwi.com/create";

const PUBLIC_KEY_VAR: &str = "QIWI_P2P_PUBLIC_KEY";
const SECRET_KEY_VAR: &str = "QIWI_P2P_SECRET_KEY";
const API_URL_VAR: &str = "QIWI_P2P_API_URL";
const OPLATA_URL_VAR: &str = "QIWI_P2P_OPLATA_URL";
const TIMEOUT_VAR: &str = "QIWI_P2P_TIMEOUT_SECONDS";

/// Client options for customization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Bills endpoint (default: [`DEFAULT_API_BASE_URL`]).
    pub api_base_url: String,
    /// Hosted form endpoint (default: [`DEFAULT_OPLATA_URL`]).
    pub oplata_url: String,
    /// Per-request timeout of the default transport. `None` leaves requests
    /// unbounded.
    pub timeout_seconds: Option<u64>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            oplata_url: DEFAULT_OPLATA_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl ClientOptions {
    /// Point the client at another bills endpoint, e.g. a mock server.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Point hosted-form URLs at another endpoint.
    #[must_use]
    pub fn with_oplata_url(mut self, url: impl Into<String>) -> Self {
        self.oplata_url = url.into();
        self
    }

    /// Bound each request of the default transport.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }
}

/// Credentials plus options.
#[derive(Clone)]
pub struct ClientConfig {
    /// Public key, used for hosted-form URLs.
    pub public_key: String,
    /// Secret key, sent as the bearer token.
    pub secret_key: String,
    /// Endpoint and transport options.
    pub options: ClientOptions,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

/// Secrets file structure.
#[derive(Debug, Deserialize)]
struct SecretsFile {
    public_key: String,
    secret_key: String,
}

impl ClientConfig {
    /// Build a config with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if either key is empty.
    pub fn new(
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let config = Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            options: ClientOptions::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// `QIWI_P2P_PUBLIC_KEY` and `QIWI_P2P_SECRET_KEY` are required.
    /// `QIWI_P2P_API_URL`, `QIWI_P2P_OPLATA_URL` and
    /// `QIWI_P2P_TIMEOUT_SECONDS` override the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if a key is missing or empty.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials from a JSON secrets file
    /// (`{"public_key": "...", "secret_key": "..."}`) with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the file cannot be read or
    /// parsed, or a key is empty.
    pub fn from_secrets_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let secrets: SecretsFile = serde_json::from_str(&contents).map_err(|e| {
            ClientError::Configuration(format!("cannot parse {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), "Loaded QIWI P2P secrets from file");
        Self::new(secrets.public_key, secrets.secret_key)
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let required = |name: &str| {
            lookup(name)
                .ok_or_else(|| ClientError::Configuration(format!("{name} is not set")))
        };

        let mut options = ClientOptions::default();
        if let Some(url) = lookup(API_URL_VAR) {
            options.api_base_url = url;
        }
        if let Some(url) = lookup(OPLATA_URL_VAR) {
            options.oplata_url = url;
        }
        options.timeout_seconds = lookup(TIMEOUT_VAR).and_then(|s| s.parse().ok());

        let config = Self {
            public_key: required(PUBLIC_KEY_VAR)?,
            secret_key: required(SECRET_KEY_VAR)?,
            options,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.public_key.is_empty() {
            return Err(ClientError::Configuration("public key is empty".into()));
        }
        if self.secret_key.is_empty() {
            return Err(ClientError::Configuration("secret key is empty".into()));
        }
        Ok(())
    }
}
