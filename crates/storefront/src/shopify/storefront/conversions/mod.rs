//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod products;

pub use cart::{convert_checkout_session, convert_user_error};
pub use collections::{convert_collection, convert_page};
pub use products::{convert_product, convert_product_variants, convert_products};
