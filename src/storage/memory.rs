//! In-memory identity store.
//!
//! Nothing survives the process. Used for previews, where rendering a digest
//! must not commit any thread as seen.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::IdentityKey;
use crate::storage::IdentityStore;

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    seen: Mutex<HashSet<IdentityKey>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashSet<IdentityKey>>> {
        self.seen
            .lock()
            .map_err(|_| AppError::store("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn exists(&self, key: &IdentityKey) -> Result<bool> {
        Ok(self.lock()?.contains(key))
    }

    async fn record(&self, key: &IdentityKey) -> Result<()> {
        self.lock()?.insert(key.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryIdentityStore::new();
        let key = IdentityKey {
            source_group: "bitcoin".to_string(),
            title: "Weekly thread".to_string(),
            observed_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        };

        assert!(!store.exists(&key).await.unwrap());
        store.record(&key).await.unwrap();
        store.record(&key).await.unwrap();
        assert!(store.exists(&key).await.unwrap());
    }
}
