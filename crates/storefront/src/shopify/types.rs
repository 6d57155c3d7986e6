//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response types in `storefront::queries`.

use std::fmt;

use serde::{Deserialize, Serialize};

use naya_merch_core::{CartId, Money, ProductId, VariantId};

/// Option name the storefront uses for apparel sizes.
pub const SIZE_OPTION_NAME: &str = "Size";

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "M", "Olive").
    pub value: String,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Unit price.
    pub price: Money,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
}

impl ProductVariant {
    /// Value of the named option, matching the name case-insensitively.
    #[must_use]
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(name))
            .map(|option| option.value.as_str())
    }

    /// Value of the variant's size option, if it has one.
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.option_value(SIZE_OPTION_NAME)
    }
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub alt_text: Option<String>,
}

/// A product option and the values the shop offers for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

/// A catalog product with its images and variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub available_for_sale: bool,
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Price of the first variant, which is what product listings show.
    #[must_use]
    pub fn price(&self) -> Option<&Money> {
        self.variants.first().map(|variant| &variant.price)
    }

    /// Values of the size option in shop order, empty for unsized products.
    #[must_use]
    pub fn sizes(&self) -> &[String] {
        self.options
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(SIZE_OPTION_NAME))
            .map(|option| option.values.as_slice())
            .unwrap_or_default()
    }
}

// =============================================================================
// Collection and Content Types
// =============================================================================

/// A collection and the products in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    pub products: Vec<Product>,
}

/// A content page (brand story, size guide).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub handle: String,
    pub title: String,
    /// Page body as HTML.
    pub body: String,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Input for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: VariantId,
    /// Quantity.
    pub quantity: u32,
}

/// User error from a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    /// Field path that caused the error.
    pub field: Vec<String>,
    /// Error message.
    pub message: String,
}

/// The message, followed by the dotted field path when there is one.
impl fmt::Display for CartUserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.field.is_empty() {
            write!(f, " ({})", self.field.join("."))?;
        }
        Ok(())
    }
}

/// A checkout session created from the cart.
///
/// Read once: the caller redirects the browser to `checkout_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Shopify cart ID backing the checkout.
    pub id: CartId,
    /// Hosted checkout URL.
    pub checkout_url: String,
    /// Total number of units.
    pub total_quantity: u64,
    /// Total cost in the shop's currency.
    pub total: Money,
}
