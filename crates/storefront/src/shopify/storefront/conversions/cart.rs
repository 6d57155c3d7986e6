//! Cart type conversion functions.

use naya_merch_core::{CartId, Money};

use crate::shopify::ShopifyError;
use crate::shopify::types::{CartUserError, CheckoutSession};

use super::super::queries::create_checkout_cart;

/// Convert a created cart into a checkout session.
///
/// # Errors
///
/// Returns `ShopifyError::InvalidResponse` if Shopify returned a cart without
/// an ID or checkout URL.
pub fn convert_checkout_session(
    cart: create_checkout_cart::CreateCheckoutCartCartCreateCart,
) -> Result<CheckoutSession, ShopifyError> {
    let id = CartId::parse(&cart.id)
        .map_err(|e| ShopifyError::InvalidResponse(format!("cart id: {e}")))?;

    if cart.checkout_url.trim().is_empty() {
        return Err(ShopifyError::InvalidResponse(format!(
            "cart {id} has no checkout URL"
        )));
    }

    Ok(CheckoutSession {
        id,
        checkout_url: cart.checkout_url,
        total_quantity: u64::try_from(cart.total_quantity).unwrap_or(0),
        total: Money::new(
            cart.cost.total_amount.amount,
            cart.cost.total_amount.currency_code,
        ),
    })
}

/// Convert a `cartCreate` user error.
pub fn convert_user_error(
    e: create_checkout_cart::CreateCheckoutCartCartCreateUserErrors,
) -> CartUserError {
    CartUserError {
        field: e.field.unwrap_or_default(),
        message: e.message,
    }
}
