//! Runtime settings
//!
//! Layered: built-in defaults, then `BTC_PRICING_*` environment variables
//! (a `.env` file is loaded first by `main`), then command-line flags.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use btc_core::{FeedConfig, FetchMode, Provider};
use btc_price_feed::{source_for, PriceSource};

use crate::cli::Args;

pub const ENV_PREFIX: &str = "BTC_PRICING";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub concurrent: bool,
    pub coindesk_url: Option<String>,
    pub coinbase_url: Option<String>,
    pub blockchain_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: None,
            concurrent: false,
            coindesk_url: None,
            coinbase_url: None,
            blockchain_url: None,
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(None)
    }

    /// Load with an explicit environment map instead of the process env
    pub fn load_from(env: Option<HashMap<String, String>>) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(secs) = args.timeout_secs {
            self.timeout_secs = secs;
        }
        if args.concurrent {
            self.concurrent = true;
        }
        self
    }

    pub fn feed_config(&self) -> FeedConfig {
        let config = FeedConfig::default().with_timeout(Duration::from_secs(self.timeout_secs));
        match &self.user_agent {
            Some(agent) => config.with_user_agent(agent.clone()),
            None => config,
        }
    }

    pub fn fetch_mode(&self) -> FetchMode {
        if self.concurrent {
            FetchMode::Concurrent
        } else {
            FetchMode::Sequential
        }
    }

    pub fn endpoint(&self, provider: Provider) -> String {
        let configured = match provider {
            Provider::CoinDesk => &self.coindesk_url,
            Provider::Coinbase => &self.coinbase_url,
            Provider::BlockchainInfo => &self.blockchain_url,
        };
        configured
            .clone()
            .unwrap_or_else(|| provider.default_endpoint().to_string())
    }

    /// All feeds, honouring endpoint overrides
    pub fn sources(&self) -> Vec<Box<dyn PriceSource>> {
        Provider::ALL
            .iter()
            .map(|p| source_for(*p, self.endpoint(*p)))
            .collect()
    }
}
