//! Request-level error kinds and their HTTP mapping.

use thiserror::Error;

use crate::gateway::types::{
    STATUS_BAD_REQUEST, STATUS_NOT_FOUND, STATUS_UNAUTHORIZED,
};
use crate::mail::MailerError;

/// Every way a single submission can fail. None of these are fatal to the
/// process; each one becomes a response.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("authentication token mismatch")]
    Unauthorized,

    #[error("POST method is expected, got {0}")]
    MethodNotAllowed(String),

    #[error("/submit path is expected, got {0}")]
    PathNotFound(String),

    #[error("invalid content type: {0:?}")]
    InvalidContentType(Option<String>),

    #[error("unable to read body. {0}")]
    UnreadableBody(String),

    #[error("unable to decode body. {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("unable to unmarshal json. {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("unable to send email. {0}")]
    Send(#[from] MailerError),
}

impl RequestError {
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::Unauthorized => STATUS_UNAUTHORIZED,
            RequestError::MethodNotAllowed(_) | RequestError::PathNotFound(_) => STATUS_NOT_FOUND,
            RequestError::InvalidContentType(_)
            | RequestError::UnreadableBody(_)
            | RequestError::InvalidEncoding(_)
            | RequestError::InvalidJson(_)
            | RequestError::MissingField(_)
            | RequestError::Send(_) => STATUS_BAD_REQUEST,
        }
    }

    /// Body returned to the caller. Only provider failures expose detail.
    pub fn response_body(&self) -> String {
        match self {
            RequestError::Unauthorized => "unauthorized".to_string(),
            RequestError::MethodNotAllowed(_) | RequestError::PathNotFound(_) => {
                "page not found".to_string()
            }
            RequestError::Send(_) => self.to_string(),
            _ => "bad request".to_string(),
        }
    }

    /// Short machine-friendly label used in log events.
    pub fn reason(&self) -> &'static str {
        match self {
            RequestError::Unauthorized => "unauthorized",
            RequestError::MethodNotAllowed(_) => "method_not_allowed",
            RequestError::PathNotFound(_) => "path_not_found",
            RequestError::InvalidContentType(_) => "invalid_content_type",
            RequestError::UnreadableBody(_) => "unreadable_body",
            RequestError::InvalidEncoding(_) => "invalid_encoding",
            RequestError::InvalidJson(_) => "invalid_json",
            RequestError::MissingField(_) => "missing_field",
            RequestError::Send(_) => "send_failed",
        }
    }
}
