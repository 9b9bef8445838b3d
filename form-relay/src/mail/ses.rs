//! Amazon SES (v2 API) mailer.

use async_trait::async_trait;
use aws_sdk_sesv2::config::Region;
use aws_sdk_sesv2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sesv2::operation::send_email::SendEmailError;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;
use tracing::{info, warn};

use super::{Mailer, MailerError, OutboundEmail, CHARSET};
use crate::config::Config;

pub struct SesMailer {
    client: Client,
    configuration_set: Option<String>,
}

impl SesMailer {
    pub fn new(client: Client, configuration_set: Option<String>) -> Self {
        Self {
            client,
            configuration_set,
        }
    }

    /// Load AWS credentials from the environment and pin the SES region.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.ses_region.clone()))
            .load()
            .await;

        info!(
            region = %config.ses_region,
            configuration_set = ?config.ses_configuration_set,
            "ses_client_created"
        );

        Self::new(Client::new(&sdk_config), config.ses_configuration_set.clone())
    }
}

#[async_trait]
impl Mailer for SesMailer {
    fn provider(&self) -> &'static str {
        "ses"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, MailerError> {
        let message = Message::builder()
            .subject(utf8_content(&email.subject)?)
            .body(Body::builder().html(utf8_content(&email.html_body)?).build())
            .build();

        let destination = Destination::builder()
            .set_to_addresses(Some(email.recipients.clone()))
            .build();

        let result = self
            .client
            .send_email()
            .from_email_address(&email.sender)
            .destination(destination)
            .content(EmailContent::builder().simple(message).build())
            .set_configuration_set_name(self.configuration_set.clone())
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.message_id().unwrap_or_default().to_string()),
            Err(err) => Err(classify_error(err)),
        }
    }
}

fn utf8_content(data: &str) -> Result<Content, MailerError> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| MailerError::InvalidMessage(e.to_string()))
}

/// Map an SDK failure onto a [`MailerError`] category.
///
/// Service errors are rendered as `Code: message`; anything that never
/// reached SES keeps the SDK's full error chain.
fn classify_error(err: SdkError<SendEmailError>) -> MailerError {
    let context = DisplayErrorContext(&err).to_string();
    let service_error = err.into_service_error();

    let detail = match (service_error.code(), service_error.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => context,
    };

    warn!(
        code = service_error.code().unwrap_or("none"),
        detail = %detail,
        "ses_send_error"
    );

    match service_error {
        SendEmailError::MessageRejected(_) => MailerError::MessageRejected(detail),
        SendEmailError::MailFromDomainNotVerifiedException(_) => {
            MailerError::SenderNotVerified(detail)
        }
        SendEmailError::NotFoundException(_) => MailerError::ConfigurationNotFound(detail),
        SendEmailError::SendingPausedException(_)
        | SendEmailError::AccountSuspendedException(_) => MailerError::SendingPaused(detail),
        other if other.code().is_some() => MailerError::Provider(detail),
        _ => MailerError::Transport(detail),
    }
}
