//! Web server module for running the form handler outside Lambda.
//!
//! This module provides a thin axum server that:
//! - Exposes `/health` for local health checks
//! - Sends every other request through the same pipeline as the Lambda

pub mod handlers;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{health, submit, AppState, HealthResponse, MAX_BODY_BYTES};

/// Build the router used by the `form-relay-web` binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(submit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::{test_config, RecordingMailer, FULL_BODY, TOKEN};
    use crate::handler::FormHandler;
    use crate::mail::MailerError;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(mailer: Arc<RecordingMailer>) -> Router {
        router(AppState::new(FormHandler::new(test_config(&[]), mailer)))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn submit_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-authtoken", token)
            .body(Body::from(FULL_BODY))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(RecordingMailer::succeeding()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_submit_sends_email() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let response = app(mailer.clone())
            .oneshot(submit_request("POST", "/submit", TOKEN))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "ok");
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_token_on_unknown_path() {
        let response = app(Arc::new(RecordingMailer::succeeding()))
            .oneshot(submit_request("GET", "/anything", "nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "unauthorized");
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let response = app(Arc::new(RecordingMailer::succeeding()))
            .oneshot(submit_request("POST", "/contact", TOKEN))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "page not found");
    }

    #[tokio::test]
    async fn test_non_utf8_body_with_wrong_token_is_unauthorized() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let request = Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .header("x-authtoken", "wrong")
            .body(Body::from(vec![0xff, 0xfe, 0x00]))
            .unwrap();

        let response = app(mailer.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "unauthorized");
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_body_with_valid_token_is_bad_request() {
        let mailer = Arc::new(RecordingMailer::succeeding());
        let request = Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .header("x-authtoken", TOKEN)
            .body(Body::from(vec![0xff, 0xfe, 0x00]))
            .unwrap();

        let response = app(mailer.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "bad request");
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_checked_after_auth() {
        let oversized = vec![b' '; MAX_BODY_BYTES + 1];

        let wrong_token = Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .header("x-authtoken", "wrong")
            .body(Body::from(oversized.clone()))
            .unwrap();
        let response = app(Arc::new(RecordingMailer::succeeding()))
            .oneshot(wrong_token)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let right_token = Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .header("x-authtoken", TOKEN)
            .body(Body::from(oversized))
            .unwrap();
        let response = app(Arc::new(RecordingMailer::succeeding()))
            .oneshot(right_token)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "bad request");
    }

    #[tokio::test]
    async fn test_provider_error_surfaced() {
        let mailer = Arc::new(RecordingMailer::failing(MailerError::SendingPaused(
            "SendingPausedException: Sending is paused for this account.".to_string(),
        )));
        let response = app(mailer)
            .oneshot(submit_request("POST", "/submit/", TOKEN))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "unable to send email. SendingPausedException: Sending is paused for this account."
        );
    }
}
