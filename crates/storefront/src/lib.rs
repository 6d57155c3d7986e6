//! NAYA merch storefront library.
//!
//! Catalog, cart and checkout service for the merch store. Catalog reads go
//! straight to the Shopify Storefront API. Carts are kept in the shopper's
//! session; checkout resolves each line to a Shopify variant and hands off to
//! Shopify's hosted checkout.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod shopify;
pub mod state;
