//! Shared-secret header authentication.
//!
//! The form embeds a static token that the site sends in `x-authtoken`.

use tracing::warn;

/// Header carrying the shared secret.
pub const AUTH_HEADER: &str = "x-authtoken";

/// Check the provided header value against the configured secret.
///
/// A missing header is treated as the empty string, so an unconfigured
/// (empty) secret accepts requests without the header.
pub fn verify_auth_token(expected: &str, provided: Option<&str>) -> bool {
    let provided = provided.unwrap_or_default();

    let valid = constant_time_compare(expected, provided);

    if !valid {
        warn!(
            has_header = !provided.is_empty(),
            expected_length = expected.len(),
            actual_length = provided.len(),
            "auth_token_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
