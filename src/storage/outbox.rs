//! Spool for digests whose delivery failed.
//!
//! Novelty is committed before delivery, so a digest that could not be sent
//! is the only remaining copy of its new threads. Parking the rendered message
//! lets a later `resend` retry delivery without running novelty detection again.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::DigestMessage;

const MAX_SEQUENCE: u32 = 1000;

/// A parked message and the file holding it.
#[derive(Debug, Clone)]
pub struct ParkedMessage {
    pub path: PathBuf,
    pub message: DigestMessage,
}

/// Directory of JSON-encoded [`DigestMessage`]s.
#[derive(Debug, Clone)]
pub struct Outbox {
    dir: PathBuf,
}

impl Outbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `message` for later delivery and return its file path.
    ///
    /// Names are never reused; a taken name gets the next sequence number.
    pub async fn park(&self, message: &DigestMessage) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f").to_string();
        let bytes = serde_json::to_vec_pretty(message)?;

        for seq in 0..MAX_SEQUENCE {
            let path = self.dir.join(format!("digest-{stamp}-{seq:03}.json"));
            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            file.write_all(&bytes).await?;
            file.flush().await?;
            file.sync_data().await?;
            return Ok(path);
        }

        Err(AppError::delivery(format!(
            "outbox {} has no free name for {stamp}",
            self.dir.display()
        )))
    }

    /// All readable parked messages, oldest first.
    ///
    /// Files that do not decode are logged and left in place.
    pub async fn pending(&self) -> Result<Vec<ParkedMessage>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut parked = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice(&bytes) {
                Ok(message) => parked.push(ParkedMessage { path, message }),
                Err(e) => log::warn!("Skipping unreadable parked digest {}: {e}", path.display()),
            }
        }
        Ok(parked)
    }

    /// Drop a parked message after it was delivered.
    pub async fn remove(&self, parked: &ParkedMessage) -> Result<()> {
        tokio::fs::remove_file(&parked.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn message(subject: &str) -> DigestMessage {
        DigestMessage {
            subject: subject.to_string(),
            html_body: "<h1 id=\"Reddit\">Reddit</h1>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_outbox() {
        let tmp = TempDir::new().unwrap();
        let outbox = Outbox::new(tmp.path().join("outbox"));
        assert!(outbox.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_park_and_remove() {
        let tmp = TempDir::new().unwrap();
        let outbox = Outbox::new(tmp.path().join("outbox"));

        let path = outbox.park(&message("news for 2026-03-01")).await.unwrap();
        assert!(path.exists());

        let pending = outbox.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message.subject, "news for 2026-03-01");

        outbox.remove(&pending[0]).await.unwrap();
        assert!(outbox.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_park_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let outbox = Outbox::new(tmp.path().join("outbox"));

        let mut paths = Vec::new();
        for i in 0..5 {
            paths.push(outbox.park(&message(&format!("digest {i}"))).await.unwrap());
        }
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 5);

        let subjects: Vec<String> = outbox
            .pending()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.message.subject)
            .collect();
        assert_eq!(subjects.len(), 5);
        assert_eq!(subjects[0], "digest 0");
    }

    #[tokio::test]
    async fn test_pending_skips_unreadable_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("outbox");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("digest-1.json"), "{ truncated").unwrap();
        let bytes = serde_json::to_vec(&message("kept")).unwrap();
        std::fs::write(dir.join("digest-2.json"), bytes).unwrap();

        let pending = Outbox::new(&dir).pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message.subject, "kept");
        assert!(dir.join("digest-1.json").exists());
    }

    #[tokio::test]
    async fn test_pending_is_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("outbox");
        std::fs::create_dir_all(&dir).unwrap();
        for (name, subject) in [("digest-2.json", "second"), ("digest-1.json", "first")] {
            let bytes = serde_json::to_vec(&message(subject)).unwrap();
            std::fs::write(dir.join(name), bytes).unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let pending = Outbox::new(&dir).pending().await.unwrap();
        let subjects: Vec<_> = pending.iter().map(|p| p.message.subject.as_str()).collect();
        assert_eq!(subjects, vec!["first", "second"]);
    }
}
