//! Price quote type

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

use crate::{FetchError, FetchResult, Provider};

/// A single provider's BTC price observation.
///
/// A quote always carries a finite, positive price. Fields are read-only
/// once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    provider: Provider,
    endpoint: String,
    currency_code: String,
    price: f64,
    timestamp: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        provider: Provider,
        endpoint: impl Into<String>,
        currency_code: impl Into<String>,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> FetchResult<Self> {
        if !price.is_finite() || price <= 0.0 {
            return Err(FetchError::InvalidPrice(price));
        }

        Ok(Self {
            provider,
            endpoint: endpoint.into(),
            currency_code: currency_code.into(),
            price,
            timestamp,
        })
    }

    /// Build a quote stamped with the current UTC time
    pub fn captured_now(
        provider: Provider,
        endpoint: impl Into<String>,
        currency_code: impl Into<String>,
        price: f64,
    ) -> FetchResult<Self> {
        Self::new(provider, endpoint, currency_code, price, Utc::now())
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "API Provider: {}", self.provider)?;
        writeln!(f, "API Endpoint: {}", self.endpoint)?;
        writeln!(
            f,
            "Timestamp: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
        )?;
        write!(f, "BTC Price: {} ({})", self.price, self.currency_code)
    }
}
