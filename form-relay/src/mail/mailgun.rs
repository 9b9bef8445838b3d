//! Mailgun messages API mailer.
//!
//! Reference: https://documentation.mailgun.com/docs/mailgun/api-reference/openapi-final/tag/Messages/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::{Mailer, MailerError, OutboundEmail};
use crate::config::ConfigError;

/// JSON body Mailgun answers with, on success and on most failures.
#[derive(Debug, Default, Deserialize)]
struct MailgunReply {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct MailgunMailer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl MailgunMailer {
    pub fn new(
        api_base: &str,
        domain: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let endpoint = messages_endpoint(api_base, domain)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidSetting {
                name: "MAIL_TIMEOUT_MS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    fn provider(&self) -> &'static str {
        "mailgun"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, MailerError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("from", email.sender.as_str()),
            ("subject", email.subject.as_str()),
            ("html", email.html_body.as_str()),
        ];
        for recipient in &email.recipients {
            form.push(("to", recipient.as_str()));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| MailerError::Transport(format!("Mailgun request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            MailerError::Transport(format!(
                "Mailgun returned {} but the body could not be read: {e}",
                status.as_u16()
            ))
        })?;

        if status.is_success() {
            let reply: MailgunReply = serde_json::from_str(&text).unwrap_or_default();
            return Ok(reply.id.unwrap_or_default());
        }

        let err = classify_failure(status, &text);
        warn!(status = status.as_u16(), kind = err.kind(), "mailgun_send_error");
        Err(err)
    }
}

/// Resolve `{api_base}/v3/{domain}/messages`.
fn messages_endpoint(api_base: &str, domain: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSetting {
        name: "MAILGUN_API_BASE",
        reason,
    };

    let mut base = Url::parse(api_base).map_err(|e| invalid(e.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("v3/{}/messages", domain.trim()))
        .map_err(|e| invalid(e.to_string()))
}

/// Map a non-2xx Mailgun answer onto a [`MailerError`].
fn classify_failure(status: StatusCode, body: &str) -> MailerError {
    let message = serde_json::from_str::<MailgunReply>(body)
        .ok()
        .and_then(|reply| reply.message)
        .unwrap_or_else(|| body.trim().to_string());

    let detail = format!("Mailgun returned {}: {}", status.as_u16(), message);

    match status {
        StatusCode::BAD_REQUEST => MailerError::MessageRejected(detail),
        StatusCode::NOT_FOUND => MailerError::ConfigurationNotFound(detail),
        StatusCode::FORBIDDEN => MailerError::SendingPaused(detail),
        StatusCode::UNAUTHORIZED => MailerError::Provider(detail),
        s if s.is_server_error() => MailerError::Transport(detail),
        _ => MailerError::Provider(detail),
    }
}
