//! Outbound email delivery.
//!
//! This module provides:
//! - The `Mailer` capability the form handler sends through
//! - Amazon SES and Mailgun implementations
//! - Startup wiring that picks one based on `MAIL_PROVIDER`

pub mod mailgun;
pub mod ses;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError, MailProvider};

pub use mailgun::MailgunMailer;
pub use ses::SesMailer;

/// Character encoding for subject and body.
pub const CHARSET: &str = "UTF-8";

/// A fully rendered email ready for the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Categorized provider failure. The payload is the provider's own error
/// text and is what callers see in the response body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailerError {
    #[error("{0}")]
    MessageRejected(String),

    #[error("{0}")]
    SenderNotVerified(String),

    #[error("{0}")]
    ConfigurationNotFound(String),

    #[error("{0}")]
    SendingPaused(String),

    #[error("{0}")]
    InvalidMessage(String),

    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    Transport(String),
}

impl MailerError {
    pub fn kind(&self) -> &'static str {
        match self {
            MailerError::MessageRejected(_) => "message_rejected",
            MailerError::SenderNotVerified(_) => "sender_not_verified",
            MailerError::ConfigurationNotFound(_) => "configuration_not_found",
            MailerError::SendingPaused(_) => "sending_paused",
            MailerError::InvalidMessage(_) => "invalid_message",
            MailerError::Provider(_) => "provider",
            MailerError::Transport(_) => "transport",
        }
    }
}

/// Something that can deliver an [`OutboundEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Provider name for logs.
    fn provider(&self) -> &'static str;

    /// Send the email, returning the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String, MailerError>;
}

/// Build the configured mailer. Failures here are startup faults.
pub async fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match config.mail_provider {
        MailProvider::Ses => Arc::new(SesMailer::from_config(config).await),
        MailProvider::Mailgun => {
            let api_key = config
                .mailgun_api_key
                .clone()
                .ok_or(ConfigError::MissingSetting("MAILGUN_API_KEY"))?;
            let domain = config
                .mailgun_domain
                .as_deref()
                .ok_or(ConfigError::MissingSetting("MAILGUN_DOMAIN"))?;

            let mailer = MailgunMailer::new(
                &config.mailgun_api_base,
                domain,
                api_key,
                Duration::from_millis(config.mail_timeout_ms),
            )
            .context("Failed to create Mailgun client")?;
            Arc::new(mailer)
        }
    };

    info!(provider = mailer.provider(), "mailer_created");

    Ok(mailer)
}
