//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency every provider is queried in
pub const CURRENCY_CODE: &str = "USD";

/// Supported public price providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    CoinDesk,
    Coinbase,
    BlockchainInfo,
}

impl Provider {
    /// Invocation order of an aggregation run
    pub const ALL: [Provider; 3] = [
        Provider::CoinDesk,
        Provider::Coinbase,
        Provider::BlockchainInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Provider::CoinDesk => "CoinDesk",
            Provider::Coinbase => "Coinbase",
            Provider::BlockchainInfo => "Blockchain.info",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::CoinDesk => "https://api.coindesk.com/v1/bpi/currentprice.json",
            Provider::Coinbase => "https://api.coinbase.com/v2/prices/spot?currency=USD",
            Provider::BlockchainInfo => "https://blockchain.info/ticker",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_order() {
        assert_eq!(
            Provider::ALL,
            [Provider::CoinDesk, Provider::Coinbase, Provider::BlockchainInfo]
        );
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::CoinDesk.to_string(), "CoinDesk");
        assert_eq!(Provider::Coinbase.to_string(), "Coinbase");
        assert_eq!(Provider::BlockchainInfo.to_string(), "Blockchain.info");
    }
}
