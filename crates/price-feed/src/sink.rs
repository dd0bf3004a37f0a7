//! Feed event sinks
//!
//! The aggregator reports what happened during a run through a sink handed
//! to it at construction, so nothing in the pipeline touches a global
//! logger directly.

use parking_lot::Mutex;
use tracing::{error, info, warn};

use btc_core::{FetchError, Provider, Quote};

/// Something that happened during an aggregation run
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    RunStarted { sources: usize },
    QuoteFetched { quote: Quote },
    FetchFailed {
        provider: Provider,
        endpoint: String,
        error: FetchError,
    },
    RunFinished {
        success_count: usize,
        average_price: Option<f64>,
    },
}

pub trait FeedSink: Send + Sync {
    fn record(&self, event: &FeedEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FeedSink for TracingSink {
    fn record(&self, event: &FeedEvent) {
        match event {
            FeedEvent::RunStarted { sources } => {
                info!("Pulling values from {} public APIs", sources);
            }
            FeedEvent::QuoteFetched { quote } => {
                info!(
                    provider = %quote.provider(),
                    endpoint = quote.endpoint(),
                    price = quote.price(),
                    currency = quote.currency_code(),
                    "Successfully pulled pricing data"
                );
            }
            FeedEvent::FetchFailed {
                provider,
                endpoint,
                error,
            } => {
                warn!(
                    provider = %provider,
                    endpoint = endpoint.as_str(),
                    category = error.category(),
                    "Price fetch failed: {}",
                    error
                );
            }
            FeedEvent::RunFinished {
                success_count,
                average_price: Some(average),
            } => {
                info!(
                    "Aggregated {} quotes, average price {:.2}",
                    success_count, average
                );
            }
            FeedEvent::RunFinished {
                average_price: None,
                ..
            } => {
                error!("No provider returned a usable price");
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CapturingSink {
    events: Mutex<Vec<FeedEvent>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedEvent> {
        self.events.lock().clone()
    }

    /// Failures recorded so far, as (provider, endpoint, error)
    pub fn failures(&self) -> Vec<(Provider, String, FetchError)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                FeedEvent::FetchFailed {
                    provider,
                    endpoint,
                    error,
                } => Some((*provider, endpoint.clone(), error.clone())),
                _ => None,
            })
            .collect()
    }
}

impl FeedSink for CapturingSink {
    fn record(&self, event: &FeedEvent) {
        self.events.lock().push(event.clone());
    }
}
