//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding `market.api_key`.
pub const ENV_CMC_API_KEY: &str = "DIGEST_CMC_API_KEY";
/// Environment variable overriding `email.username`.
pub const ENV_SMTP_USERNAME: &str = "DIGEST_SMTP_USERNAME";
/// Environment variable overriding `email.password`.
pub const ENV_SMTP_PASSWORD: &str = "DIGEST_SMTP_PASSWORD";
/// Environment variable overriding `store.database_url`.
pub const ENV_DATABASE_URL: &str = "DIGEST_DATABASE_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings shared by every source
    #[serde(default)]
    pub http: HttpConfig,

    /// Forum source and section settings
    #[serde(default)]
    pub forum: ForumConfig,

    /// Market-data source settings
    #[serde(default)]
    pub market: MarketConfig,

    /// Event calendar source settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Identity store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Email delivery settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Spool for digests whose delivery failed
    #[serde(default)]
    pub outbox: OutboxConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply secret overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply secret overrides from an arbitrary lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_CMC_API_KEY) {
            self.market.api_key = key;
        }
        if let Some(user) = lookup(ENV_SMTP_USERNAME) {
            self.email.username = Some(user);
        }
        if let Some(pass) = lookup(ENV_SMTP_PASSWORD) {
            self.email.password = Some(pass);
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.store.database_url = Some(url);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.forum.heading.trim().is_empty() {
            return Err(AppError::validation("forum.heading is empty"));
        }
        if self.market.limit == 0 {
            return Err(AppError::validation("market.limit must be > 0"));
        }
        if self.store.backend == StoreBackend::Postgres && self.store.database_url.is_none() {
            return Err(AppError::validation(
                "store.database_url is required for the postgres backend",
            ));
        }
        if self.email.smtp_port == 0 {
            return Err(AppError::validation("email.smtp_port must be > 0"));
        }
        Ok(())
    }

    /// Validate the settings needed to send mail.
    pub fn validate_email(&self) -> Result<()> {
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::validation("email.smtp_host is empty"));
        }
        if self.email.from.trim().is_empty() {
            return Err(AppError::validation("email.from is empty"));
        }
        if self.email.to.is_empty() {
            return Err(AppError::validation("email.to has no recipients"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Forum source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumConfig {
    /// API host serving `/r/{group}.json` listings
    #[serde(default = "defaults::forum_base_url")]
    pub base_url: String,

    /// Host that thread permalinks are resolved against
    #[serde(default = "defaults::forum_link_base")]
    pub link_base: String,

    /// Section heading and anchor
    #[serde(default = "defaults::forum_heading")]
    pub heading: String,

    /// Groups to fetch, in display order
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::forum_base_url(),
            link_base: defaults::forum_link_base(),
            heading: defaults::forum_heading(),
            groups: Vec::new(),
        }
    }
}

/// Market-data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// API host (pro or sandbox)
    #[serde(default = "defaults::market_base_url")]
    pub base_url: String,

    /// API key sent as `X-CMC_PRO_API_KEY`
    #[serde(default)]
    pub api_key: String,

    /// Number of listings requested
    #[serde(default = "defaults::market_limit")]
    pub limit: u32,

    /// Symbols shown in the price table
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::market_base_url(),
            api_key: String::new(),
            limit: defaults::market_limit(),
            symbols: Vec::new(),
        }
    }
}

/// Event calendar source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Base URL of per-coin calendar pages
    #[serde(default = "defaults::calendar_base_url")]
    pub base_url: String,

    /// Coin slugs to scrape, in display order
    #[serde(default)]
    pub coins: Vec<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::calendar_base_url(),
            coins: Vec::new(),
        }
    }
}

/// Identity store backends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Append-only JSON Lines ledger on local disk
    #[default]
    Local,
    /// Process memory; nothing survives the run
    Memory,
    /// PostgreSQL table (requires the `postgres` feature)
    Postgres,
}

/// Identity store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Ledger file, relative to the storage directory
    #[serde(default = "defaults::ledger")]
    pub ledger: PathBuf,

    /// Connection string for the postgres backend
    #[serde(default)]
    pub database_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            ledger: defaults::ledger(),
            database_url: None,
        }
    }
}

/// Email delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// Implicit-TLS SMTP port
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Recipient addresses; all receive the same document
    #[serde(default)]
    pub to: Vec<String>,

    /// Subject prefix, followed by the run date
    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            username: None,
            password: None,
            from: String::new(),
            to: Vec::new(),
            subject_prefix: defaults::subject_prefix(),
        }
    }
}

/// Outbox settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxConfig {
    /// Spool directory, relative to the storage directory
    #[serde(default = "defaults::outbox_dir")]
    pub dir: PathBuf,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            dir: defaults::outbox_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Source defaults
    pub fn forum_base_url() -> String {
        "https://www.reddit.com".into()
    }
    pub fn forum_link_base() -> String {
        "https://reddit.com".into()
    }
    pub fn forum_heading() -> String {
        "Reddit".into()
    }
    pub fn market_base_url() -> String {
        "https://pro-api.coinmarketcap.com".into()
    }
    pub fn market_limit() -> u32 {
        400
    }
    pub fn calendar_base_url() -> String {
        "https://coinmarketcal.com/en/coin".into()
    }

    // Store defaults
    pub fn ledger() -> PathBuf {
        PathBuf::from("seen.jsonl")
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        465
    }
    pub fn subject_prefix() -> String {
        "news for".into()
    }
    pub fn outbox_dir() -> PathBuf {
        PathBuf::from("outbox")
    }
}
