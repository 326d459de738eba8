//! Forum thread records and their identity keys.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A forum thread observed during one fetch cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadRecord {
    /// Forum group the thread was listed in (e.g. a subreddit)
    pub source_group: String,

    /// Calendar date the thread was created on (UTC)
    pub observed_date: NaiveDate,

    /// Thread title
    pub title: String,

    /// Absolute link to the thread
    pub url: String,
}

impl ThreadRecord {
    /// The identity used to decide whether this thread was seen before.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            source_group: self.source_group.clone(),
            title: self.title.clone(),
            observed_date: self.observed_date,
        }
    }
}

/// Identity of a thread across cycles.
///
/// Two threads with the same group, title and creation date are the same item,
/// regardless of their URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub source_group: String,
    pub title: String,
    pub observed_date: NaiveDate,
}

/// Persisted trace of an identity key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeenRecord {
    #[serde(flatten)]
    pub key: IdentityKey,

    /// When the key was first recorded
    pub recorded_at: DateTime<Utc>,
}

impl SeenRecord {
    pub fn new(key: IdentityKey) -> Self {
        Self {
            key,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_thread(url: &str) -> ThreadRecord {
        ThreadRecord {
            source_group: "rust".to_string(),
            observed_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            title: "Announcing Rust 1.99".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn identity_ignores_url() {
        let a = sample_thread("https://reddit.com/r/rust/comments/a");
        let b = sample_thread("https://reddit.com/r/rust/comments/b");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn seen_record_serializes_flat() {
        let record = SeenRecord::new(sample_thread("x").identity_key());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source_group"], "rust");
        assert_eq!(json["observed_date"], "2026-03-01");
        assert!(json.get("key").is_none());
    }
}
