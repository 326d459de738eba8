// src/models/mod.rs

//! Domain models for the digest application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod calendar;
mod config;
mod digest;
mod price;
mod thread;

// Re-export all public types
pub use calendar::CalendarRecord;
pub use config::{
    CalendarConfig, Config, ENV_CMC_API_KEY, ENV_DATABASE_URL, ENV_SMTP_PASSWORD,
    ENV_SMTP_USERNAME, EmailConfig, ForumConfig, HttpConfig, MarketConfig, OutboxConfig,
    StoreBackend, StoreConfig,
};
pub use digest::{Digest, DigestMessage, DigestSection, SectionStatus};
pub use price::{PriceRecord, format_price, round_to_tenth, round_to_whole};
pub use thread::{IdentityKey, SeenRecord, ThreadRecord};
