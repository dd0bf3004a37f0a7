//! BTC spot price aggregation
//!
//! Features:
//! - One feed per public price provider, each parsing its own JSON shape
//! - Per-provider fault isolation: a failed feed is reported, never raised
//! - Unweighted mean over the feeds that answered
//! - Injectable transport and event sink for offline testing

pub mod aggregator;
pub mod feeds;
pub mod sink;
pub mod transport;

pub use aggregator::{AggregationResult, PriceAggregator, SourceFailure};
pub use feeds::{
    default_sources, source_for, BlockchainInfoSource, CoinDeskSource, CoinbaseSource,
    ParsedPrice, PriceSource,
};
pub use sink::{CapturingSink, FeedEvent, FeedSink, TracingSink};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, StaticTransport};
