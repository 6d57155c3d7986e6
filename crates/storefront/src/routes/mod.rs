//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog (JSON, read from Shopify)
//! GET  /products               - Product listing (?limit=, default 50)
//! GET  /products/{id}          - Product detail (bare or encoded global ID)
//! GET  /collections/{handle}   - Collection and its products
//! GET  /pages/{handle}         - Content page
//!
//! # Cart (JSON, stored in the session)
//! GET  /cart                   - Cart contents
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add item (merges by product ID)
//! POST /cart/update            - Set quantity (min 1)
//! POST /cart/increment         - Quantity + 1
//! POST /cart/decrement         - Quantity - 1 (min 1)
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! POST /checkout               - Create checkout, return URL and total
//! POST /checkout/redirect      - Create checkout, 303 to Shopify
//! ```
//!
//! Checkout creates a Shopify cart and empties the session cart, so it is
//! only reachable by `POST`; link prefetching never starts one.

pub mod cart;
pub mod catalog;

use axum::{
    Json, Router,
    middleware::from_fn,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Liveness check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
}

/// Liveness health check endpoint.
///
/// Does not check Shopify reachability.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::index))
        .route("/products/{id}", get(catalog::show))
        .route("/collections/{handle}", get(catalog::collection))
        .route("/pages/{handle}", get(catalog::page))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/checkout/redirect", post(cart::checkout_redirect))
}

/// Build the application with its session layer from config.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    app_with_session_layer(state, session_layer)
}

/// Build the application around a given session layer.
///
/// Adds request IDs and request tracing. Sentry layers are added by the
/// binary.
pub fn app_with_session_layer(
    state: AppState,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Router {
    routes()
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
