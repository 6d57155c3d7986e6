//! NAYA Merch Core - Shared types and the cart store.
//!
//! This crate provides the pieces of the storefront that do not talk to
//! anything: type-safe identifiers, money, and the shopping cart itself.
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session handling. The storefront crate owns one [`Cart`] per
//! browser session and hands it to checkout explicitly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product/variant IDs and money
//! - [`cart`] - The in-memory cart store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartLineItem, NewCartItem};
pub use types::*;
