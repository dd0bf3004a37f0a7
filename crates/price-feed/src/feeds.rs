//! Provider price feed implementations
//!
//! Each feed owns one fixed endpoint and knows the JSON path of the BTC price
//! in that provider's response.

use async_trait::async_trait;
use serde_json::Value;

use btc_core::{FetchError, FetchResult, Provider, Quote, CURRENCY_CODE};
use crate::transport::HttpTransport;

/// Price and currency pulled out of a provider response
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    pub currency_code: String,
    pub price: f64,
}

/// Base trait for price sources
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn provider(&self) -> Provider;

    fn endpoint(&self) -> &str;

    /// Extract the price from a raw response body
    fn parse(&self, body: &str) -> FetchResult<ParsedPrice>;

    /// One GET against the endpoint, then parse. Never retries.
    async fn fetch(&self, transport: &dyn HttpTransport) -> FetchResult<Quote> {
        let response = transport.get(self.endpoint()).await?;

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }

        let parsed = self.parse(&response.body)?;
        Quote::captured_now(
            self.provider(),
            self.endpoint(),
            parsed.currency_code,
            parsed.price,
        )
    }
}

/// CoinDesk current price ticker, `bpi.USD.rate`
#[derive(Debug, Clone)]
pub struct CoinDeskSource {
    endpoint: String,
}

impl CoinDeskSource {
    pub const RATE_FIELD: &'static str = "bpi.USD.rate";

    pub fn new() -> Self {
        Self::with_endpoint(Provider::CoinDesk.default_endpoint())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for CoinDeskSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for CoinDeskSource {
    fn provider(&self) -> Provider {
        Provider::CoinDesk
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse(&self, body: &str) -> FetchResult<ParsedPrice> {
        let json = parse_json(body)?;
        let rate = match lookup(&json, "/bpi/USD/rate", Self::RATE_FIELD)? {
            // Formatted with thousands separators, e.g. "12,345.67"
            Value::String(s) => Value::String(s.replace(',', "")),
            other => other.clone(),
        };

        Ok(ParsedPrice {
            currency_code: CURRENCY_CODE.to_string(),
            price: coerce_price(&rate, Self::RATE_FIELD)?,
        })
    }
}

/// Coinbase USD spot price, `data.amount` / `data.currency`
#[derive(Debug, Clone)]
pub struct CoinbaseSource {
    endpoint: String,
}

impl CoinbaseSource {
    pub const AMOUNT_FIELD: &'static str = "data.amount";
    pub const CURRENCY_FIELD: &'static str = "data.currency";

    pub fn new() -> Self {
        Self::with_endpoint(Provider::Coinbase.default_endpoint())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for CoinbaseSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for CoinbaseSource {
    fn provider(&self) -> Provider {
        Provider::Coinbase
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse(&self, body: &str) -> FetchResult<ParsedPrice> {
        let json = parse_json(body)?;

        // Reported code is passed through, not checked against USD
        let currency_code = lookup(&json, "/data/currency", Self::CURRENCY_FIELD)?
            .as_str()
            .ok_or(FetchError::MissingField(Self::CURRENCY_FIELD))?
            .to_string();
        let amount = lookup(&json, "/data/amount", Self::AMOUNT_FIELD)?;

        Ok(ParsedPrice {
            currency_code,
            price: coerce_price(amount, Self::AMOUNT_FIELD)?,
        })
    }
}

/// Blockchain.info ticker, 15 minute trailing price at `USD.15m`
#[derive(Debug, Clone)]
pub struct BlockchainInfoSource {
    endpoint: String,
}

impl BlockchainInfoSource {
    pub const PRICE_FIELD: &'static str = "USD.15m";

    pub fn new() -> Self {
        Self::with_endpoint(Provider::BlockchainInfo.default_endpoint())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for BlockchainInfoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for BlockchainInfoSource {
    fn provider(&self) -> Provider {
        Provider::BlockchainInfo
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse(&self, body: &str) -> FetchResult<ParsedPrice> {
        let json = parse_json(body)?;
        let price = lookup(&json, "/USD/15m", Self::PRICE_FIELD)?;

        Ok(ParsedPrice {
            currency_code: CURRENCY_CODE.to_string(),
            price: coerce_price(price, Self::PRICE_FIELD)?,
        })
    }
}

/// Build the feed for a provider against a given endpoint
pub fn source_for(provider: Provider, endpoint: impl Into<String>) -> Box<dyn PriceSource> {
    match provider {
        Provider::CoinDesk => Box::new(CoinDeskSource::with_endpoint(endpoint)),
        Provider::Coinbase => Box::new(CoinbaseSource::with_endpoint(endpoint)),
        Provider::BlockchainInfo => Box::new(BlockchainInfoSource::with_endpoint(endpoint)),
    }
}

/// All feeds against their public endpoints, in invocation order
pub fn default_sources() -> Vec<Box<dyn PriceSource>> {
    Provider::ALL
        .iter()
        .map(|p| source_for(*p, p.default_endpoint()))
        .collect()
}

fn parse_json(body: &str) -> FetchResult<Value> {
    serde_json::from_str(body).map_err(|e| FetchError::MalformedJson(e.to_string()))
}

fn lookup<'a>(json: &'a Value, pointer: &str, field: &'static str) -> FetchResult<&'a Value> {
    match json.pointer(pointer) {
        Some(Value::Null) | None => Err(FetchError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

/// Accept a JSON number or a numeric string
fn coerce_price(value: &Value, field: &'static str) -> FetchResult<f64> {
    let unparsable = || FetchError::UnparsableNumber {
        field,
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(unparsable),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| unparsable()),
        _ => Err(unparsable()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpResponse, StaticTransport};

    #[test]
    fn test_coindesk_strips_thousands_separators() {
        let body = r#"{"bpi":{"USD":{"code":"USD","rate":"12,345.67","rate_float":12345.67}}}"#;
        let parsed = CoinDeskSource::new().parse(body).unwrap();

        assert_eq!(parsed.price, 12345.67);
        assert_eq!(parsed.currency_code, "USD");
    }

    #[test]
    fn test_coindesk_accepts_numeric_rate() {
        let body = r#"{"bpi":{"USD":{"rate":12345.67}}}"#;
        let parsed = CoinDeskSource::new().parse(body).unwrap();

        assert_eq!(parsed.price, 12345.67);
    }

    #[test]
    fn test_coindesk_missing_rate() {
        let body = r#"{"bpi":{"USD":{"code":"USD"}}}"#;
        assert_eq!(
            CoinDeskSource::new().parse(body),
            Err(FetchError::MissingField("bpi.USD.rate"))
        );
        assert_eq!(
            CoinDeskSource::new().parse("{}"),
            Err(FetchError::MissingField("bpi.USD.rate"))
        );
    }

    #[test]
    fn test_coindesk_garbage_rate() {
        let body = r#"{"bpi":{"USD":{"rate":"twelve"}}}"#;
        assert!(matches!(
            CoinDeskSource::new().parse(body),
            Err(FetchError::UnparsableNumber { field: "bpi.USD.rate", .. })
        ));
    }

    #[test]
    fn test_coinbase_passes_currency_through() {
        let body = r#"{"data":{"currency":"EUR","amount":"99.5"}}"#;
        let parsed = CoinbaseSource::new().parse(body).unwrap();

        assert_eq!(parsed.currency_code, "EUR");
        assert_eq!(parsed.price, 99.5);
    }

    #[test]
    fn test_coinbase_rejects_thousands_separators() {
        let body = r#"{"data":{"currency":"USD","amount":"1,000"}}"#;
        assert!(matches!(
            CoinbaseSource::new().parse(body),
            Err(FetchError::UnparsableNumber { field: "data.amount", .. })
        ));
    }

    #[test]
    fn test_coinbase_missing_fields() {
        assert_eq!(
            CoinbaseSource::new().parse(r#"{"data":{"amount":"99.5"}}"#),
            Err(FetchError::MissingField("data.currency"))
        );
        assert_eq!(
            CoinbaseSource::new().parse(r#"{"data":{"currency":"USD"}}"#),
            Err(FetchError::MissingField("data.amount"))
        );
        assert_eq!(
            CoinbaseSource::new().parse(r#"{"errors":[{"id":"not_found"}]}"#),
            Err(FetchError::MissingField("data.currency"))
        );
    }

    #[test]
    fn test_blockchain_info_reads_fifteen_minute_price() {
        let body = r#"{"USD":{"15m":50000.0,"last":50010.5,"symbol":"$"}}"#;
        let parsed = BlockchainInfoSource::new().parse(body).unwrap();

        assert_eq!(parsed.price, 50000.0);
        assert_eq!(parsed.currency_code, "USD");
    }

    #[test]
    fn test_blockchain_info_missing_window() {
        assert_eq!(
            BlockchainInfoSource::new().parse(r#"{"USD":{}}"#),
            Err(FetchError::MissingField("USD.15m"))
        );
    }

    #[test]
    fn test_non_numeric_types_rejected() {
        let result = BlockchainInfoSource::new().parse(r#"{"USD":{"15m":true}}"#);
        assert!(matches!(result, Err(FetchError::UnparsableNumber { .. })));
    }

    #[test]
    fn test_malformed_body() {
        for source in default_sources() {
            assert!(matches!(
                source.parse("<html>502 Bad Gateway</html>"),
                Err(FetchError::MalformedJson(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_fetch_builds_quote() {
        let source = CoinbaseSource::with_endpoint("https://coinbase.test/spot");
        let transport = StaticTransport::new().with_json(
            "https://coinbase.test/spot",
            r#"{"data":{"base":"BTC","currency":"USD","amount":"64123.01"}}"#,
        );

        let quote = source.fetch(&transport).await.unwrap();

        assert_eq!(quote.provider(), Provider::Coinbase);
        assert_eq!(quote.endpoint(), "https://coinbase.test/spot");
        assert_eq!(quote.currency_code(), "USD");
        assert_eq!(quote.price(), 64123.01);
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let source = BlockchainInfoSource::with_endpoint("https://ticker.test");
        let transport = StaticTransport::new().with_response(
            "https://ticker.test",
            HttpResponse::new(503, r#"{"USD":{"15m":1.0}}"#),
        );

        assert_eq!(
            source.fetch(&transport).await,
            Err(FetchError::Http { status: 503 })
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_zero_price() {
        let source = CoinDeskSource::with_endpoint("https://coindesk.test");
        let transport = StaticTransport::new()
            .with_json("https://coindesk.test", r#"{"bpi":{"USD":{"rate":"0.00"}}}"#);

        assert_eq!(
            source.fetch(&transport).await,
            Err(FetchError::InvalidPrice(0.0))
        );
    }

    #[tokio::test]
    async fn test_fetch_propagates_network_failure() {
        let source = CoinDeskSource::with_endpoint("https://unreachable.test");
        let result = source.fetch(&StaticTransport::new()).await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[test]
    fn test_default_sources_order() {
        let providers: Vec<Provider> = default_sources().iter().map(|s| s.provider()).collect();
        assert_eq!(providers, Provider::ALL.to_vec());
    }
}
