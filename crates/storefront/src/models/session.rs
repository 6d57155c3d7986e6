//! Session-related types.
//!
//! The cart itself is a [`naya_merch_core::Cart`], stored whole under
//! [`keys::CART`] and read-modify-written on every cart request.

/// Session keys.
pub mod keys {
    /// Key for the shopper's cart.
    pub const CART: &str = "cart";
}
