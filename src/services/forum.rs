// src/services/forum.rs

//! Reddit listing client.

use reqwest::Client;
use reqwest::header::HeaderMap;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ForumConfig;
use crate::services::ForumSource;
use crate::utils::append_segments;
use crate::utils::http::fetch_text;

/// Fetches `/r/{group}.json` listings.
pub struct RedditClient {
    client: Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(client: Client, config: &ForumConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn listing_url(&self, group: &str) -> Result<String> {
        let listing = format!("{group}.json");
        let url = append_segments(&self.base_url, &["r", listing.as_str()])?;
        Ok(url.to_string())
    }
}

#[async_trait]
impl ForumSource for RedditClient {
    async fn fetch_listing(&self, group: &str) -> Result<String> {
        let url = self.listing_url(group)?;
        log::debug!("Fetching forum listing {}", url);
        fetch_text(&self.client, &url, HeaderMap::new())
            .await
            .map_err(|e| AppError::fetch(format!("forum group '{group}'"), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_async_client;

    #[test]
    fn test_listing_url() {
        let client = create_async_client(&HttpConfig::default()).unwrap();
        let reddit = RedditClient::new(client, &ForumConfig::default());
        assert_eq!(
            reddit.listing_url("CryptoCurrency").unwrap(),
            "https://www.reddit.com/r/CryptoCurrency.json"
        );
    }
}
