//! Newtype IDs for Shopify entity references.
//!
//! Shopify identifies everything with global IDs of the form
//! `gid://shopify/<Resource>/<number>`. The storefront also receives bare
//! numeric IDs (from product data and webhooks), so each ID type keeps
//! whatever it was given and can expand itself to the GID form on demand.
//!
//! Use the `define_gid!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use thiserror::Error;

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing an ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input string is empty or whitespace.
    #[error("id cannot be empty")]
    Empty,
}

/// Macro to define a type-safe Shopify ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string (empty strings rejected)
/// - `Debug`, `Clone`
/// - `PartialEq`, `Eq`, `Hash` on the bare ID, so `42` and
///   `gid://shopify/<Resource>/42` are the same entity
/// - `parse()`, `as_str()`, `to_gid()`
/// - `Display`, `FromStr`, `AsRef<str>` and `From<$name> for String`
///
/// # Example
///
/// ```rust
/// # use naya_merch_core::define_gid;
/// define_gid!(OrderId, "Order");
///
/// let id = OrderId::parse("1001").unwrap();
/// assert_eq!(id.to_gid(), "gid://shopify/Order/1001");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name used when building the global ID.
            pub const RESOURCE: &'static str = $resource;

            /// Parse an ID, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty after trimming.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID exactly as it was given.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The ID with this resource's global ID prefix removed.
            fn bare(&self) -> &str {
                self.0
                    .strip_prefix($crate::types::id::GID_PREFIX)
                    .and_then(|rest| rest.strip_prefix($resource))
                    .and_then(|rest| rest.strip_prefix('/'))
                    .unwrap_or(self.0.as_str())
            }

            /// Returns the Shopify global ID for this entity.
            ///
            /// IDs that are already global are returned unchanged.
            #[must_use]
            pub fn to_gid(&self) -> String {
                if self.0.starts_with($crate::types::id::GID_PREFIX) {
                    self.0.clone()
                } else {
                    format!("{}{}/{}", $crate::types::id::GID_PREFIX, $resource, self.0)
                }
            }
        }

        impl ::core::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.bare() == other.bare()
            }
        }

        impl ::core::cmp::Eq for $name {}

        impl ::core::hash::Hash for $name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                self.bare().hash(state);
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::types::id::IdError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
define_gid!(CartId, "Cart");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  42 ").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ProductId::parse(""), Err(IdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_to_gid_expands_bare_ids() {
        let id = ProductId::parse("8123456789").unwrap();
        assert_eq!(id.to_gid(), "gid://shopify/Product/8123456789");

        let variant = VariantId::parse("77").unwrap();
        assert_eq!(variant.to_gid(), "gid://shopify/ProductVariant/77");
    }

    #[test]
    fn test_to_gid_keeps_global_ids() {
        let id = ProductId::parse("gid://shopify/Product/42").unwrap();
        assert_eq!(id.to_gid(), "gid://shopify/Product/42");
    }

    #[test]
    fn test_bare_and_global_ids_are_equal() {
        use std::collections::HashSet;

        let bare = ProductId::parse("42").unwrap();
        let global = ProductId::parse("gid://shopify/Product/42").unwrap();
        assert_eq!(bare, global);
        assert_eq!(global.as_str(), "gid://shopify/Product/42");

        let set: HashSet<ProductId> = [bare, global].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_other_resource_gid_is_not_stripped() {
        let product = ProductId::parse("gid://shopify/ProductVariant/42").unwrap();
        assert_ne!(product, ProductId::parse("42").unwrap());
        assert_ne!(
            ProductId::parse("420").unwrap(),
            ProductId::parse("gid://shopify/Product/42").unwrap()
        );
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let id = ProductId::parse("42").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");

        let back: ProductId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }
}
