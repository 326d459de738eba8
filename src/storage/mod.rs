//! Storage abstractions for novelty tracking and undelivered digests.
//!
//! The identity store is the only component that decides whether a forum
//! thread was seen before. One handle is opened per cycle and passed to the
//! novelty filter explicitly.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Digest configuration
//! ├── seen.jsonl            # Local identity ledger (append-only)
//! └── outbox/               # Digests waiting for re-delivery
//!     └── digest-20260301T070000123-000.json
//! ```

pub mod local;
pub mod memory;
pub mod outbox;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::path::Path;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{IdentityKey, StoreBackend, StoreConfig};

// Re-export for convenience
pub use local::LocalIdentityStore;
pub use memory::MemoryIdentityStore;
pub use outbox::Outbox;
#[cfg(feature = "postgres")]
pub use postgres::PgIdentityStore;

/// Trait for identity store backends.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Whether `key` has ever been recorded.
    ///
    /// An error means the store cannot be trusted and is fatal to the cycle.
    async fn exists(&self, key: &IdentityKey) -> Result<bool>;

    /// Persist `key`. Recording an existing key is a no-op.
    async fn record(&self, key: &IdentityKey) -> Result<()>;
}

/// Open the configured identity store backend.
///
/// Relative ledger paths are resolved against `storage_dir`.
pub async fn open_store(config: &StoreConfig, storage_dir: &Path) -> Result<Box<dyn IdentityStore>> {
    match config.backend {
        StoreBackend::Local => {
            let path = storage_dir.join(&config.ledger);
            Ok(Box::new(LocalIdentityStore::open(path).await?))
        }
        StoreBackend::Memory => Ok(Box::new(MemoryIdentityStore::new())),
        StoreBackend::Postgres => open_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &StoreConfig) -> Result<Box<dyn IdentityStore>> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::config("store.database_url is not set"))?;
    let store = PgIdentityStore::connect(url).await?;
    store.ensure_schema().await?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &StoreConfig) -> Result<Box<dyn IdentityStore>> {
    Err(AppError::config(
        "postgres backend requested but the `postgres` feature is disabled",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn key() -> IdentityKey {
        IdentityKey {
            source_group: "rust".to_string(),
            title: "Hello".to_string(),
            observed_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn open_local_store_resolves_ledger_in_storage_dir() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&StoreConfig::default(), tmp.path()).await.unwrap();

        store.record(&key()).await.unwrap();
        assert!(tmp.path().join("seen.jsonl").exists());
    }

    #[tokio::test]
    async fn open_memory_store_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        };
        let store = open_store(&config, tmp.path()).await.unwrap();

        store.record(&key()).await.unwrap();
        assert!(store.exists(&key()).await.unwrap());
        assert!(!tmp.path().join("seen.jsonl").exists());
    }
}
