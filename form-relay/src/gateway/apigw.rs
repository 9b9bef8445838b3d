//! API Gateway HTTP API (payload format 2.0) adapter for Lambda.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::types::{FormRequest, FormResponse, STATUS_BAD_REQUEST};
use crate::handler::FormHandler;

/// The subset of the gateway event the handler reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub raw_path: Option<String>,
    /// Raw JSON values; non-strings are flattened to text
    #[serde(default)]
    pub headers: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: Option<GatewayRequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayRequestContext {
    #[serde(default)]
    pub http: Option<GatewayHttp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayHttp {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
}

impl From<GatewayEvent> for FormRequest {
    fn from(event: GatewayEvent) -> Self {
        let http = event
            .request_context
            .and_then(|ctx| ctx.http)
            .unwrap_or_default();

        let path = event.raw_path.unwrap_or(http.path);

        let mut request = FormRequest::new(http.method, path).base64_encoded(event.is_base64_encoded);
        for (name, value) in event.headers.unwrap_or_default() {
            if let Some(value) = header_value(value) {
                request.insert_header(&name, value);
            }
        }
        request.body = event.body.map(String::into_bytes);
        request
    }
}

/// Flatten a JSON header value the way the gateway joins repeated headers.
fn header_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(header_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Proxy integration response understood by API Gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<FormResponse> for GatewayResponse {
    fn from(response: FormResponse) -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "text/plain; charset=utf-8".to_string(),
        );

        Self {
            status_code: response.status,
            headers,
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

/// Decode a raw Lambda event and run it through the handler.
///
/// Events that do not look like a gateway request are answered with a
/// bad-request response instead of failing the invocation.
pub async fn handle_gateway_event(handler: &FormHandler, event: Value) -> GatewayResponse {
    let event = match serde_json::from_value::<GatewayEvent>(event) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "gateway_event_malformed");
            return FormResponse::new(STATUS_BAD_REQUEST, "bad request").into();
        }
    };

    let request = FormRequest::from(event);
    handler.handle(&request).await.into()
}
