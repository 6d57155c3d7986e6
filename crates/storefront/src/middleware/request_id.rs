//! Request ID middleware.
//!
//! Every request gets an ID: the upstream `x-request-id` if it looks sane,
//! otherwise a fresh UUID v4. The ID is recorded on the `http_request` span,
//! tagged on the Sentry scope, stored as a request extension, and echoed in
//! the response headers so shoppers can quote it when checkout fails.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID that is trusted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID for the current request, available as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Accept an upstream ID only if it is short printable ASCII.
fn sanitize_upstream(value: &str) -> Option<&str> {
    let valid = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    valid.then_some(value)
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(sanitize_upstream)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Extension, Router, body::Body, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(RequestId(id)): Extension<RequestId>| async move { id }),
            )
            .layer(from_fn(request_id_middleware))
    }

    #[test]
    fn test_sanitize_upstream() {
        assert_eq!(sanitize_upstream("cf-abc123"), Some("cf-abc123"));
        assert_eq!(sanitize_upstream(""), None);
        assert_eq!(sanitize_upstream("has space"), None);
        assert_eq!(sanitize_upstream(&"a".repeat(129)), None);
    }

    #[tokio::test]
    async fn test_upstream_id_is_kept() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "edge-7f3a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "edge-7f3a");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"edge-7f3a");
    }

    #[tokio::test]
    async fn test_generates_uuid_when_missing() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
