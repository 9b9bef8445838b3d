//! Configuration module for environment variable parsing.
//!
//! Every setting has a hardcoded default; unset and empty variables both fall
//! back to it.

use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::template::DEFAULT_TEMPLATE;

pub const DEFAULT_RECIPIENT: &str = "info@graphnetworks.com.au";
pub const DEFAULT_SENDER: &str = "noreply@graphnetworks.com.au";
pub const DEFAULT_SUBJECT: &str = "Form Submitted - graphnetworks.com.au";
pub const DEFAULT_SES_REGION: &str = "ap-southeast-2";
pub const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net";

/// Errors raised while loading configuration or wiring startup dependencies.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown mail provider '{0}', expected 'ses' or 'mailgun'")]
    UnknownProvider(String),

    #[error("{0} must be set when MAIL_PROVIDER=mailgun")]
    MissingSetting(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Which transactional email service delivers the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailProvider {
    #[default]
    Ses,
    Mailgun,
}

impl FromStr for MailProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ses" => Ok(MailProvider::Ses),
            "mailgun" => Ok(MailProvider::Mailgun),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for MailProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailProvider::Ses => f.write_str("ses"),
            MailProvider::Mailgun => f.write_str("mailgun"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the submission is forwarded to
    pub email_recipient: String,

    /// "From" address, must be verified with the provider
    pub email_sender: String,

    /// Subject line of the forwarded email
    pub email_subject: String,

    /// HTML template with `{field}` placeholders
    pub email_template: String,

    /// Shared secret expected in the `x-authtoken` header
    pub auth_token: String,

    // =========================================================================
    // Provider Configuration
    // =========================================================================

    pub mail_provider: MailProvider,

    /// AWS region hosting the SES identity
    pub ses_region: String,

    /// Optional SES configuration set name
    pub ses_configuration_set: Option<String>,

    pub mailgun_api_key: Option<String>,

    pub mailgun_domain: Option<String>,

    pub mailgun_api_base: String,

    /// Timeout for provider HTTP calls in milliseconds
    pub mail_timeout_ms: u64,

    // =========================================================================
    // Web Server Configuration
    // =========================================================================

    /// Port for the local web server to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mail_provider = match var("MAIL_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => MailProvider::default(),
        };

        Ok(Config {
            email_recipient: var("EMAIL_RECIPIENT")
                .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),

            email_sender: var("EMAIL_SENDER").unwrap_or_else(|| DEFAULT_SENDER.to_string()),

            email_subject: var("EMAIL_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),

            email_template: var("EMAIL_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),

            auth_token: lookup("AUTHTOKEN").unwrap_or_default(),

            mail_provider,

            ses_region: var("SES_REGION").unwrap_or_else(|| DEFAULT_SES_REGION.to_string()),

            ses_configuration_set: var("SES_CONFIGURATION_SET"),

            mailgun_api_key: var("MAILGUN_API_KEY"),

            mailgun_domain: var("MAILGUN_DOMAIN"),

            mailgun_api_base: var("MAILGUN_API_BASE")
                .unwrap_or_else(|| DEFAULT_MAILGUN_API_BASE.to_string()),

            mail_timeout_ms: parse_number(&var, "MAIL_TIMEOUT_MS", 8000),

            port: parse_number(&var, "PORT", 8080),
        })
    }

    /// Whether a shared secret is configured at all.
    pub fn auth_configured(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

/// Parse a numeric variable, warning and falling back on garbage.
fn parse_number<T, F>(var: &F, name: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = var(name) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "invalid_number_using_default");
            default
        }
    }
}
