//! Cart route handlers.
//!
//! The cart lives whole in the session. Every mutating handler loads it,
//! applies one cart operation, renders it, and only then writes it back, so a
//! cart that cannot be rendered is never stored. Checkout hands the cart to
//! Shopify and clears it on success.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use naya_merch_core::{Cart, CartLineItem, Money, NewCartItem, ProductId};

use crate::checkout::{self, CheckoutError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::AppJson;
use crate::models::session_keys;
use crate::shopify::CheckoutSession;
use crate::state::AppState;

/// Highest unit price accepted when adding to the cart.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

fn total_overflow() -> AppError {
    AppError::BadRequest("cart total is too large".to_string())
}

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    pub size: Option<String>,
    pub line_total: Decimal,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: u64,
    pub total: Decimal,
}

impl TryFrom<&CartLineItem> for CartItemView {
    type Error = AppError;

    fn try_from(line: &CartLineItem) -> Result<Self> {
        Ok(Self {
            id: line.id().to_string(),
            name: line.name().to_string(),
            price: line.price(),
            image: line.image().to_string(),
            quantity: line.quantity(),
            size: line.size().map(String::from),
            line_total: line.line_total().ok_or_else(total_overflow)?,
        })
    }
}

impl TryFrom<&Cart> for CartView {
    type Error = AppError;

    fn try_from(cart: &Cart) -> Result<Self> {
        Ok(Self {
            items: cart
                .lines()
                .iter()
                .map(CartItemView::try_from)
                .collect::<Result<_>>()?,
            count: cart.cart_count(),
            total: cart.cart_total().ok_or_else(total_overflow)?,
        })
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Checkout handoff data.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub checkout_url: String,
    pub total: Money,
}

impl From<CheckoutSession> for CheckoutView {
    fn from(session: CheckoutSession) -> Self {
        Self {
            checkout_url: session.checkout_url,
            total: session.total,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, or an empty one.
async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Save the cart to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Load the cart, apply `op`, render it, and save it back.
///
/// The session is left untouched when the new cart cannot be rendered.
async fn modify_cart(session: &Session, op: impl FnOnce(&mut Cart)) -> Result<Json<CartView>> {
    let mut cart = load_cart(session).await?;
    op(&mut cart);
    let view = CartView::try_from(&cart)?;
    save_cart(session, &cart).await?;
    Ok(Json(view))
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub size: Option<String>,
}

impl AddToCartRequest {
    fn into_item(self) -> Result<NewCartItem> {
        if self.price.is_sign_negative() {
            return Err(AppError::BadRequest("price must not be negative".to_string()));
        }
        if self.price > MAX_UNIT_PRICE {
            return Err(AppError::BadRequest(format!(
                "price must not exceed {MAX_UNIT_PRICE}"
            )));
        }
        // Blank sizes come from "no size" form selects.
        let size = self
            .size
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(NewCartItem {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            size,
        })
    }
}

/// Set quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub id: ProductId,
    pub quantity: i64,
}

/// Request naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::try_from(&cart)?))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCountView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCountView {
        count: cart.cart_count(),
    }))
}

/// Add an item to the cart.
#[instrument(skip(session, body), fields(product_id = %body.id))]
pub async fn add(
    session: Session,
    AppJson(body): AppJson<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let item = body.into_item()?;
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", item.id.as_str())]));
    modify_cart(&session, |cart| cart.add_to_cart(item)).await
}

/// Set a line's quantity (clamped to at least 1).
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    AppJson(body): AppJson<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    modify_cart(&session, |cart| {
        cart.update_quantity(&body.id, body.quantity);
    })
    .await
}

/// Increase a line's quantity by one.
#[instrument(skip(session))]
pub async fn increment(
    session: Session,
    AppJson(body): AppJson<LineRequest>,
) -> Result<Json<CartView>> {
    modify_cart(&session, |cart| {
        cart.increment(&body.id);
    })
    .await
}

/// Decrease a line's quantity by one, stopping at 1.
#[instrument(skip(session))]
pub async fn decrement(
    session: Session,
    AppJson(body): AppJson<LineRequest>,
) -> Result<Json<CartView>> {
    modify_cart(&session, |cart| {
        cart.decrement(&body.id);
    })
    .await
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    AppJson(body): AppJson<LineRequest>,
) -> Result<Json<CartView>> {
    modify_cart(&session, |cart| {
        cart.remove_from_cart(&body.id);
    })
    .await
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    modify_cart(&session, Cart::clear).await
}

/// Run checkout for the session's cart, clearing it on success.
async fn start_checkout(state: &AppState, session: &Session) -> Result<CheckoutSession> {
    let cart = load_cart(session).await?;

    let checkout_session = checkout::create_checkout(state.backend(), &cart).await?;

    add_breadcrumb(
        "checkout",
        "Checkout session created",
        Some(&[("cart_id", checkout_session.id.as_str())]),
    );

    save_cart(session, &Cart::new()).await?;

    Ok(checkout_session)
}

/// Start checkout and return the hosted checkout URL.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CheckoutView>> {
    let checkout_session = start_checkout(&state, &session).await?;
    Ok(Json(CheckoutView::from(checkout_session)))
}

/// Redirect to Shopify checkout.
///
/// An empty cart is sent back to the cart page.
#[instrument(skip(state, session))]
pub async fn checkout_redirect(State(state): State<AppState>, session: Session) -> Response {
    match start_checkout(&state, &session).await {
        Ok(checkout_session) => Redirect::to(&checkout_session.checkout_url).into_response(),
        Err(AppError::Checkout(CheckoutError::EmptyCart)) => Redirect::to("/cart").into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add_request(json: &str) -> AddToCartRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_add_request_blank_size_is_none() {
        let item = add_request(r#"{"id":"42","name":"Tee","price":"35","size":"  "}"#)
            .into_item()
            .unwrap();
        assert_eq!(item.size, None);
        assert_eq!(item.image, "");
    }

    #[test]
    fn test_add_request_keeps_size() {
        let item = add_request(r#"{"id":"42","name":"Tee","price":"35","size":"M"}"#)
            .into_item()
            .unwrap();
        assert_eq!(item.size.as_deref(), Some("M"));
        assert_eq!(item.price, Decimal::new(35, 0));
    }

    #[test]
    fn test_add_request_rejects_negative_price() {
        let err = add_request(r#"{"id":"42","name":"Tee","price":"-1"}"#)
            .into_item()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_add_request_caps_price() {
        let item = add_request(r#"{"id":"42","name":"Tee","price":"1000000"}"#)
            .into_item()
            .unwrap();
        assert_eq!(item.price, MAX_UNIT_PRICE);

        let err =
            add_request(r#"{"id":"42","name":"Tee","price":"79228162514264337593543950335"}"#)
                .into_item()
                .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_cart_view_rejects_overflowing_total() {
        let mut cart = Cart::new();
        cart.add_to_cart(NewCartItem {
            id: ProductId::parse("42").unwrap(),
            name: "Tee".to_string(),
            price: Decimal::MAX,
            image: String::new(),
            size: None,
        });
        assert!(CartView::try_from(&cart).is_ok());

        cart.increment(&ProductId::parse("42").unwrap());
        let err = CartView::try_from(&cart).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_add_request_rejects_empty_id() {
        assert!(
            serde_json::from_str::<AddToCartRequest>(r#"{"id":" ","name":"Tee","price":"1"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_cart_view() {
        let mut cart = Cart::new();
        cart.add_to_cart(NewCartItem {
            id: ProductId::parse("42").unwrap(),
            name: "Tee".to_string(),
            price: Decimal::new(35, 0),
            image: "/tee.png".to_string(),
            size: Some("M".to_string()),
        });
        cart.increment(&ProductId::parse("42").unwrap());

        let view = CartView::try_from(&cart).unwrap();
        assert_eq!(view.count, 2);
        assert_eq!(view.total, Decimal::new(70, 0));
        assert_eq!(view.items[0].line_total, Decimal::new(70, 0));
        assert_eq!(view.items[0].size.as_deref(), Some("M"));
    }
}
