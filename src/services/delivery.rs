// src/services/delivery.rs

//! Digest delivery transports.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::DigestMessage;
use crate::services::DigestDelivery;

#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;

#[cfg(feature = "smtp")]
mod smtp {
    use async_trait::async_trait;
    use lettre::message::{Mailbox, Message, header};
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

    use crate::error::{AppError, Result};
    use crate::models::{DigestMessage, EmailConfig};
    use crate::services::DigestDelivery;

    /// Sends the digest as an HTML email over implicit-TLS SMTP.
    pub struct SmtpMailer {
        mailer: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
        to: Vec<Mailbox>,
    }

    impl SmtpMailer {
        pub fn from_config(config: &EmailConfig) -> Result<Self> {
            let from = parse_mailbox(&config.from)?;
            let to = config
                .to
                .iter()
                .map(|addr| parse_mailbox(addr))
                .collect::<Result<Vec<_>>>()?;
            if to.is_empty() {
                return Err(AppError::config("email.to has no recipients"));
            }

            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| AppError::config(format!("invalid email.smtp_host: {e}")))?
                .port(config.smtp_port);
            if let (Some(user), Some(pass)) = (&config.username, &config.password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }

            Ok(Self {
                mailer: builder.build(),
                from,
                to,
            })
        }

        fn build_message(&self, message: &DigestMessage) -> Result<Message> {
            let mut builder = Message::builder()
                .from(self.from.clone())
                .subject(message.subject.clone());
            for to in &self.to {
                builder = builder.to(to.clone());
            }

            builder
                .header(header::ContentType::TEXT_HTML)
                .body(message.html_body.clone())
                .map_err(AppError::delivery)
        }
    }

    fn parse_mailbox(addr: &str) -> Result<Mailbox> {
        addr.parse()
            .map_err(|e| AppError::config(format!("invalid email address '{addr}': {e}")))
    }

    #[async_trait]
    impl DigestDelivery for SmtpMailer {
        async fn deliver(&self, message: &DigestMessage) -> Result<()> {
            let email = self.build_message(message)?;
            self.mailer.send(email).await.map_err(AppError::delivery)?;
            log::info!(
                "Sent '{}' to {} recipient(s)",
                message.subject,
                self.to.len()
            );
            Ok(())
        }
    }

}

/// Writes the digest body to an HTML file instead of sending it.
#[derive(Debug, Clone)]
pub struct FileDelivery {
    path: PathBuf,
}

impl FileDelivery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DigestDelivery for FileDelivery {
    async fn deliver(&self, message: &DigestMessage) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(AppError::delivery)?;
        }
        tokio::fs::write(&self.path, &message.html_body)
            .await
            .map_err(AppError::delivery)?;
        log::info!("Wrote '{}' to {}", message.subject, self.path.display());
        Ok(())
    }
}
