//! Transport-neutral request and response types.
//!
//! Both the Lambda adapter and the local web server translate into these
//! before calling the form handler.

use std::collections::HashMap;

use crate::error::RequestError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;

/// Inbound HTTP request as seen by the form handler.
#[derive(Debug, Clone, Default)]
pub struct FormRequest {
    pub method: String,
    pub path: String,
    /// Header names are stored lowercased
    headers: HashMap<String, String>,
    /// Raw body bytes, decoded during payload parsing
    pub body: Option<Vec<u8>>,
    /// Set when the transport failed to read the body
    pub body_error: Option<String>,
    pub is_base64_encoded: bool,
}

impl FormRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Mark the body as base64 encoded.
    pub fn base64_encoded(mut self, encoded: bool) -> Self {
        self.is_base64_encoded = encoded;
        self
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Status code and plain-text body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub status: u16,
    pub body: String,
}

impl FormResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(STATUS_OK, "ok")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<&RequestError> for FormResponse {
    fn from(err: &RequestError) -> Self {
        Self::new(err.status_code(), err.response_body())
    }
}
