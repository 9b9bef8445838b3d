//! form-relay Lambda - API Gateway HTTP API entry point.
//!
//! Configuration and the mail client are built once per cold start and shared
//! by every invocation of the execution environment.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use form_relay::gateway::handle_gateway_event;
use form_relay::{build_mailer, Config, FormHandler, GatewayResponse};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true).without_time())
        .init();

    info!("lambda_starting");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        provider = %config.mail_provider,
        recipient = %config.email_recipient,
        sender = %config.email_sender,
        custom_template = config.email_template != form_relay::template::DEFAULT_TEMPLATE,
        auth_configured = config.auth_configured(),
        "config_loaded"
    );

    let mailer = build_mailer(&config).await?;
    let handler = Arc::new(FormHandler::new(config, mailer));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move {
            info!(request_id = %event.context.request_id, "lambda_invocation");
            Ok::<GatewayResponse, lambda_runtime::Error>(
                handle_gateway_event(&handler, event.payload).await,
            )
        }
    }))
    .await
    .map_err(|e| anyhow!(e))
}
