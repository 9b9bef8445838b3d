//! The form submission pipeline.
//!
//! ```text
//! FormRequest → authenticate → method → path → parse → render → send → FormResponse
//! ```
//!
//! Every step short-circuits into a response; nothing is retried.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::auth::{verify_auth_token, AUTH_HEADER};
use crate::config::Config;
use crate::error::RequestError;
use crate::gateway::{FormRequest, FormResponse};
use crate::mail::{Mailer, OutboundEmail};
use crate::submission::parse_submission;
use crate::template;

/// Accepted paths for the submit endpoint.
pub const SUBMIT_PATHS: [&str; 2] = ["/submit", "/submit/"];

/// Shared, immutable handler built once at startup.
#[derive(Clone)]
pub struct FormHandler {
    config: Arc<Config>,
    mailer: Arc<dyn Mailer>,
}

impl FormHandler {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        if !config.auth_configured() {
            warn!("auth_token_not_configured");
        }

        Self {
            config: Arc::new(config),
            mailer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one request through the pipeline. Always produces a response.
    pub async fn handle(&self, request: &FormRequest) -> FormResponse {
        info!(
            method = %request.method,
            path = %request.path,
            has_body = request.body.is_some(),
            is_base64_encoded = request.is_base64_encoded,
            "submission_received"
        );

        match self.process(request).await {
            Ok(()) => FormResponse::ok(),
            Err(e) => {
                match &e {
                    RequestError::Unauthorized => warn!("submission_unauthorized"),
                    RequestError::Send(mail_err) => error!(
                        provider = self.mailer.provider(),
                        kind = mail_err.kind(),
                        error = %mail_err,
                        "email_send_failed"
                    ),
                    other => warn!(
                        reason = other.reason(),
                        error = %other,
                        "submission_rejected"
                    ),
                }
                FormResponse::from(&e)
            }
        }
    }

    async fn process(&self, request: &FormRequest) -> Result<(), RequestError> {
        if !verify_auth_token(&self.config.auth_token, request.header(AUTH_HEADER)) {
            return Err(RequestError::Unauthorized);
        }

        validate_method(request)?;
        validate_path(request)?;

        let submission = parse_submission(request)?;
        let fingerprint = submission.fingerprint();

        info!(
            submission = %fingerprint,
            has_name = !submission.name.is_empty(),
            message_length = submission.message.len(),
            "submission_parsed"
        );

        let email = OutboundEmail {
            sender: self.config.email_sender.clone(),
            recipients: vec![self.config.email_recipient.clone()],
            subject: self.config.email_subject.clone(),
            html_body: template::render(&self.config.email_template, &submission),
        };

        let message_id = self.mailer.send(&email).await?;

        info!(
            submission = %fingerprint,
            provider = self.mailer.provider(),
            recipient = %self.config.email_recipient,
            message_id = %message_id,
            "email_sent"
        );

        Ok(())
    }
}

fn validate_method(request: &FormRequest) -> Result<(), RequestError> {
    if request.method != "POST" {
        return Err(RequestError::MethodNotAllowed(request.method.clone()));
    }
    Ok(())
}

fn validate_path(request: &FormRequest) -> Result<(), RequestError> {
    if !SUBMIT_PATHS.contains(&request.path.as_str()) {
        return Err(RequestError::PathNotFound(request.path.clone()));
    }
    Ok(())
}
