//! Transport collaborators for the digest pipeline.
//!
//! Each source trait returns the raw, source-native payload; turning it into
//! records is the job of [`crate::normalize`]. The traits are the seams the
//! orchestrator depends on, so tests can substitute fakes.
//!
//! - Forum listings (`RedditClient`)
//! - Market listings (`CoinMarketCapClient`)
//! - Calendar pages (`CoinMarketCalClient`)
//! - Digest delivery (`SmtpMailer`, `FileDelivery`)

mod calendar;
mod delivery;
mod forum;
mod market;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::DigestMessage;

pub use calendar::CoinMarketCalClient;
#[cfg(feature = "smtp")]
pub use delivery::SmtpMailer;
pub use delivery::FileDelivery;
pub use forum::RedditClient;
pub use market::CoinMarketCapClient;

/// Source of forum listings, one payload per group.
#[async_trait]
pub trait ForumSource: Send + Sync {
    async fn fetch_listing(&self, group: &str) -> Result<String>;
}

/// Source of market listings for all coins at once.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<String>;
}

/// Source of per-coin calendar page markup.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch_page(&self, coin: &str) -> Result<String>;
}

/// Transport for a finished digest.
#[async_trait]
pub trait DigestDelivery: Send + Sync {
    async fn deliver(&self, message: &DigestMessage) -> Result<()>;
}
