//! Request/response plumbing between hosting runtimes and the handler.
//!
//! ```text
//! API Gateway event → GatewayEvent → FormRequest → FormHandler → FormResponse → GatewayResponse
//! ```

pub mod apigw;
pub mod types;

pub use apigw::{handle_gateway_event, GatewayEvent, GatewayResponse};
pub use types::{FormRequest, FormResponse};
