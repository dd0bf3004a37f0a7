//! Error types

use thiserror::Error;

/// Reasons a single provider produced no quote.
///
/// The aggregator treats every variant the same way: the provider is
/// unavailable for this run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} is not a number: {value}")]
    UnparsableNumber { field: &'static str, value: String },

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
}

impl FetchError {
    /// Short stable name used in log lines
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Timeout => "timeout",
            FetchError::Http { .. } => "http",
            FetchError::MalformedJson(_) => "malformed_json",
            FetchError::MissingField(_) => "missing_field",
            FetchError::UnparsableNumber { .. } => "unparsable_number",
            FetchError::InvalidPrice(_) => "invalid_price",
        }
    }
}

/// Errors surfaced at the aggregator boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceFeedError {
    #[error("No provider returned a quote")]
    NoQuotes,

    #[error("Invalid USD amount: {0}")]
    InvalidAmount(f64),

    #[error("Transport setup failed: {0}")]
    Transport(String),
}

/// Result type alias
pub type FetchResult<T> = Result<T, FetchError>;
pub type PriceFeedResult<T> = Result<T, PriceFeedError>;
