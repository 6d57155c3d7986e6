//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::shopify::ShopifyError;

/// Message shown to shoppers for any failed checkout.
pub const CHECKOUT_FAILED_MESSAGE: &str = "Checkout failed, please try again";

/// Message shown when a catalog read fails upstream.
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Catalog is unavailable, please try again";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout could not be started.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store failed to load or save.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Catalog read against Shopify failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::ProductNotFound { .. }
                | CheckoutError::VariantNotFound { .. }
                | CheckoutError::NotAvailable { .. } => StatusCode::CONFLICT,
                CheckoutError::SessionCreation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::Network(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(ShopifyError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Checkout(CheckoutError::EmptyCart) => "Cart is empty".to_string(),
            Self::Checkout(_) => CHECKOUT_FAILED_MESSAGE.to_string(),
            Self::Session(_) => "Internal server error".to_string(),
            Self::Shopify(ShopifyError::NotFound(_)) => "Not found".to_string(),
            Self::Shopify(_) => CATALOG_UNAVAILABLE_MESSAGE.to_string(),
            Self::BadRequest(_) => self.to_string(),
        }
    }

    const fn is_reportable(&self) -> bool {
        !matches!(
            self,
            Self::Checkout(CheckoutError::EmptyCart)
                | Self::Shopify(ShopifyError::NotFound(_))
                | Self::BadRequest(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_reportable() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
