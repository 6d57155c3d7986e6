//! Shopping cart store.
//!
//! A [`Cart`] is a flat list of line items owned by whoever holds it (the
//! storefront keeps one per browser session). Prices and images are
//! snapshotted when an item is added; nothing here is re-fetched.
//!
//! # Line identity
//!
//! Lines are keyed by product ID alone. Adding a product that is already in
//! the cart bumps the existing line's quantity, even when a different size was
//! chosen; the existing line keeps the size it was first added with.
//!
//! # Quantities
//!
//! Every line has a quantity of at least one. Decrementing or setting a
//! quantity below one clamps to one; removing a line is a separate, explicit
//! operation.
//!
//! # Totals
//!
//! Line and cart totals use checked decimal arithmetic and are `None` when
//! the result does not fit in a [`Decimal`].

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Item details supplied when adding a product to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price at the time of adding.
    pub price: Decimal,
    /// Display image URL.
    pub image: String,
    /// Chosen size, if the product comes in sizes.
    pub size: Option<String>,
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    id: ProductId,
    name: String,
    price: Decimal,
    image: String,
    quantity: NonZeroU32,
    size: Option<String>,
}

impl CartLineItem {
    fn new(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: NonZeroU32::MIN,
            size: item.size,
        }
    }

    /// Product identifier.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price snapshotted at add time.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Display image URL.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Quantity, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Size chosen when the line was created.
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Unit price multiplied by quantity, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity.get()))
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// If a line for the same product ID exists its quantity goes up by one
    /// and the new item's details (including size) are discarded. Otherwise a
    /// new line is appended with a quantity of one.
    pub fn add_to_cart(&mut self, item: NewCartItem) {
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLineItem::new(item));
        }
    }

    /// Remove the line for a product, returning it if it was present.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Option<CartLineItem> {
        let index = self.lines.iter().position(|line| &line.id == id)?;
        Some(self.lines.remove(index))
    }

    /// Set a line's quantity, clamped to at least one.
    ///
    /// Returns the quantity that was stored, or `None` if the product is not
    /// in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Option<u32> {
        let line = self.line_mut(id)?;
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        line.quantity = NonZeroU32::new(clamped).unwrap_or(NonZeroU32::MIN);
        Some(line.quantity.get())
    }

    /// Increase a line's quantity by one.
    pub fn increment(&mut self, id: &ProductId) -> Option<u32> {
        let current = self.get(id)?.quantity();
        self.update_quantity(id, i64::from(current) + 1)
    }

    /// Decrease a line's quantity by one, never going below one.
    pub fn decrement(&mut self, id: &ProductId) -> Option<u32> {
        let current = self.get(id)?.quantity();
        self.update_quantity(id, i64::from(current) - 1)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Sum of `price * quantity` across all lines, or `None` on overflow.
    #[must_use]
    pub fn cart_total(&self) -> Option<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |total, line| {
            total.checked_add(line.line_total()?)
        })
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }
}
