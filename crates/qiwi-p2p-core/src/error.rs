//! Error types for qiwi-p2p-core.

/// A timestamp string could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DateTimeError {
    /// Not an RFC 3339 timestamp with an explicit offset.
    #[error("invalid metadata datetime {input:?}: {source}")]
    Metadata {
        /// The rejected input.
        input: String,
        /// Underlying parse failure.
        source: chrono::ParseError,
    },

    /// Not a `YYYY-MM-DDTHHMMSS` lifetime value.
    #[error("invalid lifetime {input:?}: {source}")]
    Lifetime {
        /// The rejected input.
        input: String,
        /// Underlying parse failure.
        source: chrono::ParseError,
    },

    /// The lifetime parsed but cannot be placed at UTC+3.
    #[error("lifetime {input:?} is out of range")]
    LifetimeOutOfRange {
        /// The rejected input.
        input: String,
    },
}

/// An amount string is not a decimal number.
#[derive(Debug, thiserror::Error)]
#[error("invalid amount value {value:?}: {source}")]
pub struct AmountError {
    /// The rejected value.
    pub value: String,
    /// Underlying parse failure.
    pub source: rust_decimal::Error,
}
