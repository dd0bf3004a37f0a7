//! Console rendering of an aggregation run

use serde::Serialize;

use btc_core::{PriceFeedError, PriceFeedResult, Quote};
use btc_price_feed::AggregationResult;

#[derive(Debug, Serialize)]
struct Conversion {
    usd: f64,
    btc: f64,
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    provider: String,
    endpoint: &'a str,
    category: &'static str,
    error: String,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    average_price: Option<f64>,
    success_count: usize,
    quotes: &'a [Quote],
    failures: Vec<Failure<'a>>,
    conversions: Vec<Conversion>,
}

/// Plain text report. Fails when no provider answered.
pub fn render_text(
    result: &AggregationResult,
    amounts: &[f64],
    show_quotes: bool,
) -> PriceFeedResult<String> {
    let average = result.average_price()?;
    let mut out = String::new();

    if show_quotes {
        for quote in result.quotes() {
            out.push_str(&format!("{quote}\n\n"));
        }
    }

    out.push_str(&format!("Average BTC Price: {average}\n"));
    for amount in amounts {
        let btc = result.convert(*amount)?;
        out.push_str(&format!("${amount} USD in BTC: {btc}\n"));
    }

    Ok(out)
}

/// JSON report; average and conversions are null/empty when nothing answered.
/// An amount that cannot be converted is an error, not a silent omission.
pub fn render_json(result: &AggregationResult, amounts: &[f64]) -> anyhow::Result<String> {
    let mut conversions = Vec::with_capacity(amounts.len());
    for usd in amounts {
        match result.convert(*usd) {
            Ok(btc) => conversions.push(Conversion { usd: *usd, btc }),
            Err(PriceFeedError::NoQuotes) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let failures = result
        .failures()
        .iter()
        .map(|f| Failure {
            provider: f.provider.to_string(),
            endpoint: &f.endpoint,
            category: f.error.category(),
            error: f.error.to_string(),
        })
        .collect();

    let report = Report {
        average_price: result.average_price().ok(),
        success_count: result.success_count(),
        quotes: result.quotes(),
        failures,
        conversions,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}
