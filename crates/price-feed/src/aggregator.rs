//! Price aggregator - queries every feed and averages what came back

use futures::future::join_all;
use std::sync::Arc;

use btc_core::{
    FetchError, FetchMode, FetchResult, PriceFeedError, PriceFeedResult, Provider, Quote,
};
use crate::feeds::{default_sources, PriceSource};
use crate::sink::{FeedEvent, FeedSink};
use crate::transport::HttpTransport;

/// A provider that produced no quote during a run
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub provider: Provider,
    pub endpoint: String,
    pub error: FetchError,
}

/// Outcome of one aggregation run.
///
/// The average is only defined when at least one provider answered.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    quotes: Vec<Quote>,
    failures: Vec<SourceFailure>,
    average_price: Option<f64>,
}

impl AggregationResult {
    pub fn new(quotes: Vec<Quote>, failures: Vec<SourceFailure>) -> Self {
        // Unweighted, no outlier rejection. Running mean so that large
        // prices cannot overflow an intermediate sum.
        let average_price = quotes.iter().enumerate().fold(None, |mean, (i, quote)| {
            let mean: f64 = mean.unwrap_or(0.0);
            Some(mean + (quote.price() - mean) / (i + 1) as f64)
        });

        Self {
            quotes,
            failures,
            average_price,
        }
    }

    /// Successful quotes in invocation order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    pub fn success_count(&self) -> usize {
        self.quotes.len()
    }

    pub fn average_price(&self) -> PriceFeedResult<f64> {
        self.average_price.ok_or(PriceFeedError::NoQuotes)
    }

    /// Convert a USD amount to BTC at the average price
    pub fn convert(&self, usd_amount: f64) -> PriceFeedResult<f64> {
        if !usd_amount.is_finite() {
            return Err(PriceFeedError::InvalidAmount(usd_amount));
        }
        Ok(usd_amount / self.average_price()?)
    }
}

/// Main price aggregator
pub struct PriceAggregator {
    sources: Vec<Box<dyn PriceSource>>,
    transport: Arc<dyn HttpTransport>,
    sink: Arc<dyn FeedSink>,
    mode: FetchMode,
}

impl PriceAggregator {
    /// Aggregator over the three public providers
    pub fn new(transport: Arc<dyn HttpTransport>, sink: Arc<dyn FeedSink>) -> Self {
        Self::with_sources(default_sources(), transport, sink)
    }

    /// Aggregator over an explicit, ordered set of sources
    pub fn with_sources(
        sources: Vec<Box<dyn PriceSource>>,
        transport: Arc<dyn HttpTransport>,
        sink: Arc<dyn FeedSink>,
    ) -> Self {
        Self {
            sources,
            transport,
            sink,
            mode: FetchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub fn providers(&self) -> Vec<Provider> {
        self.sources.iter().map(|s| s.provider()).collect()
    }

    /// Query every source once and average the answers.
    ///
    /// Never fails as a whole; providers that could not be read are listed
    /// in the result's failures.
    pub async fn run(&self) -> AggregationResult {
        self.sink.record(&FeedEvent::RunStarted {
            sources: self.sources.len(),
        });

        let mut quotes = Vec::with_capacity(self.sources.len());
        let mut failures = Vec::new();
        let transport = self.transport.as_ref();

        match self.mode {
            FetchMode::Sequential => {
                for source in &self.sources {
                    let outcome = source.fetch(transport).await;
                    self.settle(&**source, outcome, &mut quotes, &mut failures);
                }
            }
            FetchMode::Concurrent => {
                // join_all keeps input order
                let outcomes =
                    join_all(self.sources.iter().map(|s| s.fetch(transport))).await;
                for (source, outcome) in self.sources.iter().zip(outcomes) {
                    self.settle(&**source, outcome, &mut quotes, &mut failures);
                }
            }
        }

        let result = AggregationResult::new(quotes, failures);
        self.sink.record(&FeedEvent::RunFinished {
            success_count: result.success_count(),
            average_price: result.average_price().ok(),
        });

        result
    }

    fn settle(
        &self,
        source: &dyn PriceSource,
        outcome: FetchResult<Quote>,
        quotes: &mut Vec<Quote>,
        failures: &mut Vec<SourceFailure>,
    ) {
        match outcome {
            Ok(quote) => {
                self.sink.record(&FeedEvent::QuoteFetched {
                    quote: quote.clone(),
                });
                quotes.push(quote);
            }
            Err(error) => {
                self.sink.record(&FeedEvent::FetchFailed {
                    provider: source.provider(),
                    endpoint: source.endpoint().to_string(),
                    error: error.clone(),
                });
                failures.push(SourceFailure {
                    provider: source.provider(),
                    endpoint: source.endpoint().to_string(),
                    error,
                });
            }
        }
    }
}
