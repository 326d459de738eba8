// src/normalize/market.rs

//! Market listings normalizer.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::PriceRecord;

#[derive(Debug, Deserialize)]
struct Listings {
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawCoin {
    symbol: String,
    quote: RawQuotes,
}

#[derive(Debug, Deserialize)]
struct RawQuotes {
    #[serde(rename = "USD")]
    usd: RawQuote,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    price: f64,
    percent_change_24h: f64,
    percent_change_7d: f64,
}

/// Normalize a listings payload, keeping only `symbols`, in API order.
pub fn normalize_listings(payload: &str, symbols: &[String]) -> Result<Vec<PriceRecord>> {
    let listings: Listings =
        serde_json::from_str(payload).map_err(|e| AppError::fetch("market", e))?;
    let tracked: HashSet<&str> = symbols.iter().map(String::as_str).collect();

    let mut records = Vec::new();
    for item in listings.data {
        // Untracked coins are not inspected, so their shape never matters
        let Some(symbol) = item.get("symbol").and_then(Value::as_str) else {
            continue;
        };
        if !tracked.contains(symbol) {
            continue;
        }

        let coin: RawCoin = match serde_json::from_value(item) {
            Ok(coin) => coin,
            Err(e) => {
                log::warn!("Skipping malformed listing: {e}");
                continue;
            }
        };

        let quote = &coin.quote.usd;
        match PriceRecord::from_quote(
            &coin.symbol,
            quote.price,
            quote.percent_change_24h,
            quote.percent_change_7d,
        ) {
            Some(record) => records.push(record),
            None => log::warn!("Skipping listing {}: non-finite quote", coin.symbol),
        }
    }

    let missing: Vec<&str> = symbols
        .iter()
        .map(String::as_str)
        .filter(|s| !records.iter().any(|r| r.symbol == *s))
        .collect();
    if !missing.is_empty() {
        log::debug!("Tracked symbols absent from listings: {}", missing.join(", "));
    }

    Ok(records)
}
