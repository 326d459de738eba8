// src/pipeline/resend.rs

//! Retry delivery of parked digests.

use crate::error::Result;
use crate::services::DigestDelivery;
use crate::storage::Outbox;
use crate::utils::log as progress;

/// Deliver every parked message, oldest first, and return how many were sent.
///
/// Each message is removed once delivered. The first failure stops the run
/// so later digests never overtake an earlier one.
pub async fn run_resend(outbox: &Outbox, delivery: &dyn DigestDelivery) -> Result<usize> {
    progress::header("Resending parked digests");

    let pending = outbox.pending().await?;
    if pending.is_empty() {
        log::info!("Outbox {} is empty", outbox.dir().display());
        return Ok(0);
    }

    let total = pending.len();
    for (index, parked) in pending.iter().enumerate() {
        progress::step(index + 1, total, &parked.message.subject);
        delivery.deliver(&parked.message).await?;
        outbox.remove(parked).await?;
    }

    progress::summary("Resend", &[("Delivered", total.to_string())]);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::models::DigestMessage;

    /// Accepts `budget` messages, then fails.
    struct FlakyDelivery {
        budget: usize,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DigestDelivery for FlakyDelivery {
        async fn deliver(&self, message: &DigestMessage) -> Result<()> {
            let mut sent = self.sent.lock().unwrap();
            if sent.len() >= self.budget {
                return Err(AppError::delivery("smtp closed"));
            }
            sent.push(message.subject.clone());
            Ok(())
        }
    }

    fn message(subject: &str) -> DigestMessage {
        DigestMessage {
            subject: subject.to_string(),
            html_body: String::new(),
        }
    }

    fn outbox_with(tmp: &TempDir, subjects: &[&str]) -> Outbox {
        let dir = tmp.path().join("outbox");
        std::fs::create_dir_all(&dir).unwrap();
        for (i, subject) in subjects.iter().enumerate() {
            let bytes = serde_json::to_vec(&message(subject)).unwrap();
            std::fs::write(dir.join(format!("digest-{i}.json")), bytes).unwrap();
        }
        Outbox::new(dir)
    }

    #[tokio::test]
    async fn test_resend_drains_outbox() {
        let tmp = TempDir::new().unwrap();
        let outbox = outbox_with(&tmp, &["news for 2026-03-01", "news for 2026-03-02"]);
        let delivery = FlakyDelivery {
            budget: usize::MAX,
            sent: Mutex::new(Vec::new()),
        };

        assert_eq!(run_resend(&outbox, &delivery).await.unwrap(), 2);
        assert_eq!(
            *delivery.sent.lock().unwrap(),
            vec!["news for 2026-03-01", "news for 2026-03-02"]
        );
        assert!(outbox.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resend_stops_at_first_failure() {
        let tmp = TempDir::new().unwrap();
        let outbox = outbox_with(&tmp, &["first", "second", "third"]);
        let delivery = FlakyDelivery {
            budget: 1,
            sent: Mutex::new(Vec::new()),
        };

        assert!(run_resend(&outbox, &delivery).await.is_err());

        let left: Vec<String> = outbox
            .pending()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.message.subject)
            .collect();
        assert_eq!(left, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn test_resend_empty_outbox() {
        let tmp = TempDir::new().unwrap();
        let outbox = Outbox::new(tmp.path().join("missing"));
        let delivery = FlakyDelivery {
            budget: 0,
            sent: Mutex::new(Vec::new()),
        };
        assert_eq!(run_resend(&outbox, &delivery).await.unwrap(), 0);
    }
}
