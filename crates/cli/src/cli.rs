//! Command-line arguments

use clap::Parser;

/// Amounts converted when none are given on the command line
pub const DEFAULT_AMOUNTS: [f64; 3] = [10.0, 100.0, 1000.0];

/// Average the BTC spot price across public providers and convert USD to BTC
#[derive(Debug, Clone, Parser)]
#[command(name = "btc-pricing", version, about)]
pub struct Args {
    /// USD amount to convert (repeatable)
    #[arg(short, long = "amount", value_name = "USD")]
    pub amounts: Vec<f64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Query providers concurrently instead of one after another
    #[arg(long)]
    pub concurrent: bool,

    /// Print every provider quote
    #[arg(long)]
    pub quotes: bool,

    /// Emit a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn amounts(&self) -> Vec<f64> {
        if self.amounts.is_empty() {
            DEFAULT_AMOUNTS.to_vec()
        } else {
            self.amounts.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_amounts() {
        let args = Args::parse_from(["btc-pricing"]);
        assert_eq!(args.amounts(), vec![10.0, 100.0, 1000.0]);
        assert!(!args.json);
        assert!(!args.concurrent);
    }

    #[test]
    fn test_repeated_amounts() {
        let args = Args::parse_from([
            "btc-pricing",
            "--amount",
            "25",
            "-a",
            "2.5",
            "--timeout-secs",
            "3",
            "--quotes",
        ]);
        assert_eq!(args.amounts(), vec![25.0, 2.5]);
        assert_eq!(args.timeout_secs, Some(3));
        assert!(args.quotes);
    }
}
