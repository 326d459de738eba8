// src/services/calendar.rs

//! CoinMarketCal page client.

use reqwest::Client;
use reqwest::header::HeaderMap;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::CalendarConfig;
use crate::services::CalendarSource;
use crate::utils::append_segments;
use crate::utils::http::fetch_text;

/// Fetches the calendar page of one coin.
pub struct CoinMarketCalClient {
    client: Client,
    base_url: String,
}

impl CoinMarketCalClient {
    pub fn new(client: Client, config: &CalendarConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl CalendarSource for CoinMarketCalClient {
    async fn fetch_page(&self, coin: &str) -> Result<String> {
        let url = append_segments(&self.base_url, &[coin])?;
        log::debug!("Fetching calendar page {}", url);
        fetch_text(&self.client, url.as_str(), HeaderMap::new())
            .await
            .map_err(|e| AppError::fetch(format!("calendar coin '{coin}'"), e))
    }
}
