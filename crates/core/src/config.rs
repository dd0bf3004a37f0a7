//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP settings shared by every provider request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: format!("btc-pricing/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// How an aggregation run schedules its provider calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    #[default]
    Sequential,
    Concurrent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_bounded() {
        let config = FeedConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("btc-pricing/"));
    }

    #[test]
    fn test_builders() {
        let config = FeedConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("btc-pricing-test");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "btc-pricing-test");
    }
}
