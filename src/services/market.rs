// src/services/market.rs

//! CoinMarketCap listings client.

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::MarketConfig;
use crate::services::MarketSource;
use crate::utils::append_segments;
use crate::utils::http::fetch_text;

const API_KEY_HEADER: &str = "x-cmc_pro_api_key";

/// Fetches `/v1/cryptocurrency/listings/latest`.
pub struct CoinMarketCapClient {
    client: Client,
    base_url: String,
    api_key: String,
    limit: u32,
}

impl CoinMarketCapClient {
    pub fn new(client: Client, config: &MarketConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            limit: config.limit,
        }
    }

    fn listings_url(&self) -> Result<String> {
        let mut url = append_segments(
            &self.base_url,
            &["v1", "cryptocurrency", "listings", "latest"],
        )?;
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string());
        Ok(url.to_string())
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| AppError::config(format!("market.api_key is not a valid header: {e}")))?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }
}

#[async_trait]
impl MarketSource for CoinMarketCapClient {
    async fn fetch_listings(&self) -> Result<String> {
        let url = self.listings_url()?;
        let headers = self.headers()?;
        log::debug!("Fetching market listings {}", url);
        fetch_text(&self.client, &url, headers)
            .await
            .map_err(|e| AppError::fetch("market", e))
    }
}
