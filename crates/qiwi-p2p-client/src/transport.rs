//! HTTP transport seam.
//!
//! The client never talks to `reqwest` directly; it hands a
//! [`TransportRequest`] to a [`Transport`] and gets a [`TransportResponse`]
//! back. [`ReqwestTransport`] is the default. Any plain function or closure
//! with the right signature is a transport too, which is how tests stub the
//! API out.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

/// Error produced by a transport.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// One outgoing HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Headers, sent in order. Values go out as given; names are
    /// case-insensitive and the default transport writes them in title case.
    pub headers: Vec<(String, String)>,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// First header value with a case-insensitively matching name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The answer to a [`TransportRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Build a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs HTTP exchanges on behalf of the client.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// A non-2xx status is a successful exchange, not an error.
    async fn execute(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<F> Transport for F
where
    F: Fn(TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync,
{
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        self(request)
    }
}

/// Default transport backed by a pooled [`reqwest::Client`].
///
/// No user agent is set. Header names are written in HTTP/1 title case
/// (`x-api-key` goes out as `X-Api-Key`).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport without a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(None)
    }

    /// Build a transport, optionally bounding each request.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().http1_title_case_headers();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Reuse an existing client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}
