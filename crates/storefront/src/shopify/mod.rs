//! Shopify Storefront API client and the backend seam checkout runs against.
//!
//! # Architecture
//!
//! - Uses `graphql_client` for the GraphQL request/response envelope
//! - Shopify is source of truth - NO local sync, direct API calls
//! - Routes and checkout depend on [`CommerceBackend`], not on the HTTP
//!   client, so they can run against a fake in tests
//!
//! # Example
//!
//! ```rust,ignore
//! use naya_merch_storefront::shopify::{CommerceBackend, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! let variants = client.product_variants(&product_id).await?;
//! let session = client.create_checkout(vec![CartLineInput {
//!     merchandise_id: variants[0].id.clone(),
//!     quantity: 1,
//! }]).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::{MAX_PRODUCT_PAGE_SIZE, StorefrontClient};
pub use types::*;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use naya_merch_core::ProductId;

/// Commerce backend operations: catalog reads and checkout.
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    /// Fetch the first `first` products in the catalog.
    async fn products(&self, first: u32) -> Result<Vec<Product>, ShopifyError>;

    /// Fetch one product with its images and variants.
    ///
    /// Returns `ShopifyError::NotFound` when the product does not exist.
    async fn product(&self, product_id: &ProductId) -> Result<Product, ShopifyError>;

    /// Fetch a collection and its products by handle.
    ///
    /// Returns `ShopifyError::NotFound` when the collection does not exist.
    async fn collection(&self, handle: &str) -> Result<Collection, ShopifyError>;

    /// Fetch a content page by handle.
    ///
    /// Returns `ShopifyError::NotFound` when the page does not exist.
    async fn page(&self, handle: &str) -> Result<Page, ShopifyError>;

    /// Fetch every purchasable unit of a product.
    ///
    /// Returns `ShopifyError::NotFound` when the product does not exist.
    async fn product_variants(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductVariant>, ShopifyError>;

    /// Create a checkout session from resolved lines.
    ///
    /// Returns `ShopifyError::UserError` when the backend rejects the lines.
    async fn create_checkout(
        &self,
        lines: Vec<CartLineInput>,
    ) -> Result<CheckoutSession, ShopifyError>;
}

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", join_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but is missing required data.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// `cartCreate` rejected the lines.
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Dotted response path (e.g., `cartCreate.cart.lines.0`).
    pub path: Option<String>,
    /// First source location in the operation, as `(line, column)`.
    pub location: Option<(i64, i64)>,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            location: None,
        }
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("(no message)")?;
        } else {
            f.write_str(&self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " at {path}")?;
        }
        if let Some((line, column)) = self.location {
            write!(f, " ({line}:{column})")?;
        }
        Ok(())
    }
}

fn join_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(none reported)".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ShopifyError::NotFound("Product not found: 42".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found: 42");
    }

    #[test]
    fn test_graphql_errors_joined() {
        let err = ShopifyError::GraphQL(vec![
            GraphQLError::message("Throttled"),
            GraphQLError {
                message: "Invalid global id".to_string(),
                path: Some("product".to_string()),
                location: Some((1, 26)),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Throttled; Invalid global id at product (1:26)"
        );
    }

    #[test]
    fn test_graphql_error_without_message() {
        let err = GraphQLError {
            message: String::new(),
            path: Some("cartCreate.cart".to_string()),
            location: None,
        };
        assert_eq!(err.to_string(), "(no message) at cartCreate.cart");
    }

    #[test]
    fn test_graphql_errors_empty() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(err.to_string(), "GraphQL errors: (none reported)");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }
}
