//! Price change records and numeric display rules.

use serde::{Deserialize, Serialize};

/// Price movement of one tracked coin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    /// Ticker symbol (e.g. "BTC")
    pub symbol: String,

    /// USD price, already formatted for display
    pub price: String,

    /// 24h change in percent, rounded to one decimal
    pub change_24h: f64,

    /// 7d change in percent, rounded to a whole number
    pub change_7d: i64,
}

impl PriceRecord {
    /// Build a record from raw quote values.
    ///
    /// Returns `None` if any value is not a finite number.
    pub fn from_quote(
        symbol: impl Into<String>,
        price: f64,
        change_24h: f64,
        change_7d: f64,
    ) -> Option<Self> {
        if !(price.is_finite() && change_24h.is_finite() && change_7d.is_finite()) {
            return None;
        }

        Some(Self {
            symbol: symbol.into(),
            price: format_price(price),
            change_24h: round_to_tenth(change_24h),
            change_7d: round_to_whole(change_7d),
        })
    }
}

/// Format a USD price: 3 decimals below 1, 2 decimals below 10, none otherwise.
pub fn format_price(price: f64) -> String {
    if price < 1.0 {
        format!("{price:.3}")
    } else if price < 10.0 {
        format!("{price:.2}")
    } else {
        format!("{price:.0}")
    }
}

/// Round to one decimal place using the same rule as display formatting.
pub fn round_to_tenth(value: f64) -> f64 {
    let rounded = format!("{value:.1}").parse::<f64>().unwrap_or(value);
    // -0.0 would otherwise render as "-0.0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Round to a whole number using the same rule as display formatting.
pub fn round_to_whole(value: f64) -> i64 {
    format!("{value:.0}")
        .parse::<i64>()
        .unwrap_or_else(|_| value.round() as i64)
}
