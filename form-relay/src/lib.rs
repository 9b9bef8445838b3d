//! form-relay - Contact form to email bridge.
//!
//! This library provides shared modules for the two form-relay binaries:
//! - `form-relay-lambda`: API Gateway HTTP API handler running on AWS Lambda
//! - `form-relay-web`: Local axum server running the same pipeline
//!
//! ## Architecture
//!
//! ```text
//! Request → auth → method/path → payload → template → Mailer (SES | Mailgun) → Response
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod mail;
pub mod submission;
pub mod template;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError, MailProvider};
pub use error::RequestError;
pub use gateway::{FormRequest, FormResponse, GatewayEvent, GatewayResponse};
pub use handler::FormHandler;
pub use mail::{build_mailer, Mailer, MailerError, OutboundEmail};
pub use submission::Submission;
pub use web::AppState;
