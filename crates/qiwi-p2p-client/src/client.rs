//! QIWI P2P HTTP client implementation.

use qiwi_p2p_core::{Bill, BillId, CreateBillRequest, OplataOptions};
use reqwest::Method;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ClientConfig, ClientOptions};
use crate::error::ClientError;
use crate::oplata;
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// QIWI P2P bills API client.
///
/// Holds the key pair and a transport. Every call is independent: nothing
/// about bills is remembered between calls, and nothing is retried.
/// Clones share the transport (and with it the connection pool).
#[derive(Clone)]
pub struct QiwiP2pClient {
    public_key: String,
    secret_key: String,
    api_base_url: String,
    oplata_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for QiwiP2pClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QiwiP2pClient")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("oplata_url", &self.oplata_url)
            .finish_non_exhaustive()
    }
}

impl QiwiP2pClient {
    /// Create a client with the default transport and endpoints.
    ///
    /// # Arguments
    ///
    /// * `public_key` - Public key, used for hosted-form URLs
    /// * `secret_key` - Secret key, used as the bearer token for API calls
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn new(
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::with_options(public_key, secret_key, ClientOptions::default())
    }

    /// Create a client with the default transport and custom options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn with_options(
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::with_timeout(
            options.timeout_seconds.map(Duration::from_secs),
        )
        .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_transport(public_key, secret_key, options, transport))
    }

    /// Create a client that performs HTTP through `transport`.
    #[must_use]
    pub fn with_transport(
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
        options: ClientOptions,
        transport: impl Transport + 'static,
    ) -> Self {
        let mut api_base_url = options.api_base_url;
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }

        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            api_base_url,
            oplata_url: options.oplata_url,
            transport: Arc::new(transport),
        }
    }

    /// Create a client from a loaded [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_options(config.public_key, config.secret_key, config.options)
    }

    /// The public key.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Issue a bill.
    ///
    /// Repeating the call with the same `bill_id` and body returns the
    /// existing bill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn create_bill(
        &self,
        bill_id: &BillId,
        request: &CreateBillRequest,
    ) -> Result<Bill, ClientError> {
        const OPERATION: &str = "create_bill";

        let body = serde_json::to_vec(request).map_err(|source| ClientError::Serialization {
            operation: OPERATION,
            source,
        })?;

        self.call(OPERATION, Method::PUT, bill_id.as_str(), Some(body))
            .await
    }

    /// Fetch a bill and its payment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn get_bill(&self, bill_id: &BillId) -> Result<Bill, ClientError> {
        self.call("get_bill", Method::GET, bill_id.as_str(), None)
            .await
    }

    /// Cancel an unpaid bill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn cancel_bill(&self, bill_id: &BillId) -> Result<Bill, ClientError> {
        let path = format!("{bill_id}/reject");
        self.call("cancel_bill", Method::POST, &path, None).await
    }

    /// Build a hosted payment form URL. No request is made.
    ///
    /// Unlike [`create_bill`](Self::create_bill), bills issued this way are
    /// not authenticated by the secret key.
    #[must_use]
    pub fn create_oplata_url(&self, options: &OplataOptions) -> String {
        if self.public_key.is_empty() {
            tracing::warn!("Building hosted form URL with an empty public key");
        }

        let url = oplata::build_url(&self.oplata_url, &self.public_key, options);
        tracing::debug!(bill_id = ?options.bill_id, "Built hosted form URL");
        url
    }

    async fn call(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Bill, ClientError> {
        let url = format!("{}{path}", self.api_base_url);

        tracing::debug!(operation, %method, path, "Sending QIWI P2P request");

        let request = TransportRequest {
            method,
            url,
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.secret_key),
                ),
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        };

        let response = self.transport.execute(request).await.map_err(|source| {
            tracing::error!(operation, error = %source, "QIWI P2P transport failed");
            ClientError::Transport { operation, source }
        })?;

        if !(200..300).contains(&response.status) {
            tracing::warn!(
                operation,
                status = response.status,
                "QIWI P2P API returned an error"
            );
            return Err(ClientError::Api {
                operation,
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        serde_json::from_slice(&response.body)
            .map_err(|source| ClientError::Deserialization { operation, source })
    }
}
