//! Cart to checkout handoff.
//!
//! Checkout happens in two phases:
//!
//! 1. Every cart line is resolved to a purchasable variant, concurrently.
//!    Resolution happens here rather than at add-to-cart time, so a variant
//!    that sold out in the meantime is only discovered now.
//! 2. One cart is created on Shopify from the resolved lines, which yields the
//!    hosted checkout URL.
//!
//! The whole attempt is all-or-nothing. The first failed resolution aborts
//! it before any cart is created, and nothing is retried.

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{info, instrument};

use naya_merch_core::{Cart, ProductId, VariantId};

use crate::shopify::{CartLineInput, CheckoutSession, CommerceBackend, ProductVariant, ShopifyError};

/// Errors that end a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; nothing was sent to Shopify.
    #[error("cart is empty")]
    EmptyCart,

    /// The product no longer exists in the catalog.
    #[error("product {product_id} not found")]
    ProductNotFound {
        /// Product that could not be found.
        product_id: ProductId,
    },

    /// No variant of the product has the requested size.
    #[error("product {product_id} has no variant with size {size:?}")]
    VariantNotFound {
        /// Product that was searched.
        product_id: ProductId,
        /// Requested size.
        size: String,
    },

    /// The resolved variant cannot currently be purchased.
    #[error("product {product_id} is not available for sale{}", size_suffix(.size.as_deref()))]
    NotAvailable {
        /// Product that was resolved.
        product_id: ProductId,
        /// Requested size, if any.
        size: Option<String>,
    },

    /// Shopify rejected the checkout request.
    #[error("checkout session rejected: {0}")]
    SessionCreation(String),

    /// Shopify could not be reached or returned an unusable response.
    #[error("network error: {0}")]
    Network(#[source] ShopifyError),
}

impl From<ShopifyError> for CheckoutError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::UserError(message) => Self::SessionCreation(message),
            other => Self::Network(other),
        }
    }
}

fn size_suffix(size: Option<&str>) -> String {
    size.map_or_else(String::new, |s| format!(" in size {s:?}"))
}

/// Pick the variant matching an optional size.
///
/// Without a size, the first variant available for sale wins. With a size,
/// the variant whose size option equals it exactly is chosen and must be
/// available for sale.
///
/// # Errors
///
/// Returns `VariantNotFound` when no variant has the size, or `NotAvailable`
/// when the chosen variant (or every variant, without a size) is sold out.
pub fn select_variant<'a>(
    product_id: &ProductId,
    variants: &'a [ProductVariant],
    size: Option<&str>,
) -> Result<&'a ProductVariant, CheckoutError> {
    let Some(size) = size else {
        return variants
            .iter()
            .find(|v| v.available_for_sale)
            .ok_or_else(|| CheckoutError::NotAvailable {
                product_id: product_id.clone(),
                size: None,
            });
    };

    let variant = variants
        .iter()
        .find(|v| v.size() == Some(size))
        .ok_or_else(|| CheckoutError::VariantNotFound {
            product_id: product_id.clone(),
            size: size.to_string(),
        })?;

    if !variant.available_for_sale {
        return Err(CheckoutError::NotAvailable {
            product_id: product_id.clone(),
            size: Some(size.to_string()),
        });
    }

    Ok(variant)
}

/// Resolve a product and optional size to a purchasable variant ID.
///
/// # Errors
///
/// Returns `ProductNotFound` if the catalog has no such product, the errors
/// of [`select_variant`], or `Network` if the catalog query fails.
#[instrument(skip(backend), fields(product_id = %product_id))]
pub async fn resolve_variant(
    backend: &dyn CommerceBackend,
    product_id: &ProductId,
    size: Option<&str>,
) -> Result<VariantId, CheckoutError> {
    let variants = match backend.product_variants(product_id).await {
        Ok(variants) => variants,
        Err(ShopifyError::NotFound(_)) => {
            return Err(CheckoutError::ProductNotFound {
                product_id: product_id.clone(),
            });
        }
        Err(e) => return Err(CheckoutError::Network(e)),
    };

    let variant = select_variant(product_id, &variants, size)?;
    tracing::debug!(variant_id = %variant.id, "Resolved variant");

    Ok(variant.id.clone())
}

/// Turn the cart into a Shopify checkout session.
///
/// The cart itself is not modified; clearing it after a successful handoff
/// is up to the caller.
///
/// # Errors
///
/// Returns `EmptyCart` without contacting Shopify when the cart is empty,
/// the first resolution error if any line fails to resolve, and
/// `SessionCreation` or `Network` if creating the checkout fails.
#[instrument(skip(backend, cart), fields(lines = cart.len(), units = cart.cart_count()))]
pub async fn create_checkout(
    backend: &dyn CommerceBackend,
    cart: &Cart,
) -> Result<CheckoutSession, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let lines = try_join_all(cart.lines().iter().map(|line| async move {
        let merchandise_id = resolve_variant(backend, line.id(), line.size()).await?;
        Ok::<_, CheckoutError>(CartLineInput {
            merchandise_id,
            quantity: line.quantity(),
        })
    }))
    .await?;

    let session = backend.create_checkout(lines).await?;
    info!(
        cart_id = %session.id,
        total = %session.total,
        "Checkout session created"
    );

    Ok(session)
}
