//! Client error types.

use crate::transport::TransportError;

/// Errors that can occur when using the QIWI P2P client.
///
/// Every per-call variant names the public operation that produced it, and
/// the message is prefixed with it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The transport could not complete the exchange.
    #[error("{operation}: transport error: {source}")]
    Transport {
        /// Operation name.
        operation: &'static str,
        /// Underlying transport failure.
        source: TransportError,
    },

    /// The API answered with a status outside `200..300`.
    #[error("{operation}: qiwi p2p api error (status code {status}): {body}")]
    Api {
        /// Operation name.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request body could not be encoded.
    #[error("{operation}: failed to serialize request: {source}")]
    Serialization {
        /// Operation name.
        operation: &'static str,
        /// Underlying encoder failure.
        source: serde_json::Error,
    },

    /// The response body is not a bill.
    #[error("{operation}: failed to deserialize response: {source}")]
    Deserialization {
        /// Operation name.
        operation: &'static str,
        /// Underlying decoder failure.
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// The operation that failed, if the error came from an API call.
    #[must_use]
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Transport { operation, .. }
            | Self::Api { operation, .. }
            | Self::Serialization { operation, .. }
            | Self::Deserialization { operation, .. } => Some(operation),
            Self::Configuration(_) => None,
        }
    }

    /// HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
