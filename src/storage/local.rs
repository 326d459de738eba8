//! Local filesystem identity store.
//!
//! Keeps every recorded identity in an append-only JSON Lines ledger, one
//! [`SeenRecord`] per line. The whole ledger is loaded when the store opens;
//! new keys are appended and flushed before `record` returns.
//!
//! ## Ledger Layout
//!
//! ```text
//! {"source_group":"rust","title":"...","observed_date":"2026-03-01","recorded_at":"..."}
//! {"source_group":"rust","title":"...","observed_date":"2026-03-01","recorded_at":"..."}
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{IdentityKey, SeenRecord};
use crate::storage::IdentityStore;

/// Local filesystem identity store backend.
pub struct LocalIdentityStore {
    path: PathBuf,
    seen: Mutex<HashSet<IdentityKey>>,
}

impl LocalIdentityStore {
    /// Open the ledger at `path`, creating nothing until the first record.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let seen = Self::load_ledger(&path).await?;
        log::debug!("Loaded {} seen records from {}", seen.len(), path.display());

        Ok(Self {
            path,
            seen: Mutex::new(seen),
        })
    }

    /// Number of distinct keys in the ledger.
    pub async fn len(&self) -> usize {
        self.seen.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.seen.lock().await.is_empty()
    }

    /// Read every ledger line; a missing file is an empty ledger.
    async fn load_ledger(path: &Path) -> Result<HashSet<IdentityKey>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => {
                return Err(AppError::store(format!(
                    "cannot read ledger {}: {e}",
                    path.display()
                )));
            }
        };

        let mut seen = HashSet::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: SeenRecord = serde_json::from_str(line).map_err(|e| {
                AppError::store(format!(
                    "corrupt ledger {} at line {}: {e}",
                    path.display(),
                    index + 1
                ))
            })?;
            seen.insert(record.key);
        }
        Ok(seen)
    }

    /// Append one record to the ledger and flush it to disk.
    async fn append(&self, record: &SeenRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(AppError::store)?;
        }

        let mut line = serde_json::to_vec(record).map_err(AppError::store)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(AppError::store)?;
        file.write_all(&line).await.map_err(AppError::store)?;
        file.flush().await.map_err(AppError::store)?;
        file.sync_data().await.map_err(AppError::store)?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for LocalIdentityStore {
    async fn exists(&self, key: &IdentityKey) -> Result<bool> {
        Ok(self.seen.lock().await.contains(key))
    }

    async fn record(&self, key: &IdentityKey) -> Result<()> {
        let mut seen = self.seen.lock().await;
        if seen.contains(key) {
            return Ok(());
        }

        self.append(&SeenRecord::new(key.clone())).await?;
        seen.insert(key.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn key(title: &str) -> IdentityKey {
        IdentityKey {
            source_group: "rust".to_string(),
            title: title.to_string(),
            observed_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_record_then_exists() {
        let tmp = TempDir::new().unwrap();
        let store = LocalIdentityStore::open(tmp.path().join("seen.jsonl"))
            .await
            .unwrap();

        assert!(!store.exists(&key("a")).await.unwrap());
        store.record(&key("a")).await.unwrap();
        assert!(store.exists(&key("a")).await.unwrap());
        assert!(!store.exists(&key("b")).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_twice_writes_one_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen.jsonl");
        let store = LocalIdentityStore::open(&path).await.unwrap();

        store.record(&key("a")).await.unwrap();
        store.record(&key("a")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_ledger_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("seen.jsonl");

        {
            let store = LocalIdentityStore::open(&path).await.unwrap();
            store.record(&key("a")).await.unwrap();
            store.record(&key("b")).await.unwrap();
        }

        let reopened = LocalIdentityStore::open(&path).await.unwrap();
        assert_eq!(reopened.len().await, 2);
        assert!(reopened.exists(&key("b")).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_ledger_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalIdentityStore::open(tmp.path().join("nope.jsonl"))
            .await
            .unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unwritable_ledger_is_store_error() {
        let tmp = TempDir::new().unwrap();
        // The ledger path is a directory, so appending fails
        let path = tmp.path().join("seen.jsonl");
        std::fs::create_dir_all(&path).unwrap();
        let store = LocalIdentityStore::open(&path).await;

        // Reading a directory fails too; either way the error is fatal
        match store {
            Err(err) => assert!(err.is_fatal()),
            Ok(store) => assert!(store.record(&key("a")).await.unwrap_err().is_fatal()),
        }
    }

    #[tokio::test]
    async fn test_corrupt_ledger_is_store_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen.jsonl");
        std::fs::write(&path, "{\"source_group\":\"rust\"\nnot json\n").unwrap();

        match LocalIdentityStore::open(&path).await {
            Err(err) => assert!(err.is_fatal()),
            Ok(_) => panic!("corrupt ledger should not open"),
        }
    }
}
