//! GraphQL operation definitions for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`] plus a
//! snake-case module holding its `Variables` and `ResponseData`, the same
//! shape `graphql_client` codegen produces. Operation documents live in
//! `graphql/storefront/queries/` and the fragments they spread in
//! `graphql/storefront/fragments/`; each document is sent with exactly the
//! fragments it uses.

use graphql_client::{GraphQLQuery, QueryBody};

macro_rules! graphql_operation {
    ($operation:ident, $module:ident) => {
        impl GraphQLQuery for $operation {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// =============================================================================
// Shared selections
// =============================================================================

/// Response shapes of the `CatalogProduct` and `CatalogVariant` fragments.
pub mod catalog {
    use rust_decimal::Decimal;
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Connection<T> {
        pub edges: Vec<Edge<T>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Edge<T> {
        pub node: T,
    }

    impl<T> Connection<T> {
        pub fn into_nodes(self) -> impl Iterator<Item = T> {
            self.edges.into_iter().map(|edge| edge.node)
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyFields {
        pub amount: Decimal,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImageFields {
        pub url: String,
        pub alt_text: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantFields {
        pub id: String,
        pub title: String,
        pub available_for_sale: bool,
        pub price: MoneyFields,
        pub selected_options: Vec<SelectedOptionFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SelectedOptionFields {
        pub name: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub description: String,
        pub tags: Vec<String>,
        pub available_for_sale: bool,
        pub images: Connection<ImageFields>,
        pub options: Vec<OptionFields>,
        pub variants: Connection<VariantFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OptionFields {
        pub name: String,
        pub option_values: Vec<OptionValueFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct OptionValueFields {
        pub name: String,
    }
}

// =============================================================================
// Product variants
// =============================================================================

/// Fetch a product's variants with their options, price and availability.
pub struct GetProductVariants;

pub mod get_product_variants {
    use serde::{Deserialize, Serialize};

    use super::catalog::{Connection, VariantFields};

    pub const OPERATION_NAME: &str = "GetProductVariants";
    pub const QUERY: &str = concat!(
        include_str!("../../../graphql/storefront/queries/product_variants.graphql"),
        include_str!("../../../graphql/storefront/fragments/variant.graphql"),
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub id: String,
        pub variant_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<GetProductVariantsProduct>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductVariantsProduct {
        pub id: String,
        pub title: String,
        pub variants: Connection<VariantFields>,
    }
}

graphql_operation!(GetProductVariants, get_product_variants);

// =============================================================================
// Catalog reads
// =============================================================================

/// Fetch the first page of products.
pub struct GetProducts;

pub mod get_products {
    use serde::{Deserialize, Serialize};

    use super::catalog::{Connection, ProductFields};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = concat!(
        include_str!("../../../graphql/storefront/queries/products.graphql"),
        include_str!("../../../graphql/storefront/fragments/product.graphql"),
        include_str!("../../../graphql/storefront/fragments/variant.graphql"),
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductFields>,
    }
}

graphql_operation!(GetProducts, get_products);

/// Fetch one product by global ID.
pub struct GetProduct;

pub mod get_product {
    use serde::{Deserialize, Serialize};

    use super::catalog::ProductFields;

    pub const OPERATION_NAME: &str = "GetProduct";
    pub const QUERY: &str = concat!(
        include_str!("../../../graphql/storefront/queries/product.graphql"),
        include_str!("../../../graphql/storefront/fragments/product.graphql"),
        include_str!("../../../graphql/storefront/fragments/variant.graphql"),
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }
}

graphql_operation!(GetProduct, get_product);

/// Fetch a collection and its products by handle.
pub struct GetCollectionByHandle;

pub mod get_collection_by_handle {
    use serde::{Deserialize, Serialize};

    use super::catalog::{Connection, ImageFields, ProductFields};

    pub const OPERATION_NAME: &str = "GetCollectionByHandle";
    pub const QUERY: &str = concat!(
        include_str!("../../../graphql/storefront/queries/collection.graphql"),
        include_str!("../../../graphql/storefront/fragments/product.graphql"),
        include_str!("../../../graphql/storefront/fragments/variant.graphql"),
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub product_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<GetCollectionByHandleCollection>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetCollectionByHandleCollection {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub description: String,
        pub image: Option<ImageFields>,
        pub products: Connection<ProductFields>,
    }
}

graphql_operation!(GetCollectionByHandle, get_collection_by_handle);

/// Fetch a content page by handle.
pub struct GetPageByHandle;

pub mod get_page_by_handle {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetPageByHandle";
    pub const QUERY: &str = include_str!("../../../graphql/storefront/queries/page.graphql");

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub page: Option<GetPageByHandlePage>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetPageByHandlePage {
        pub handle: String,
        pub title: String,
        pub body: String,
    }
}

graphql_operation!(GetPageByHandle, get_page_by_handle);

// =============================================================================
// Cart creation (checkout handoff)
// =============================================================================

/// Create a cart from resolved lines and return its checkout URL.
pub struct CreateCheckoutCart;

pub mod create_checkout_cart {
    use serde::{Deserialize, Serialize};

    pub use super::catalog::MoneyFields;

    pub const OPERATION_NAME: &str = "CreateCheckoutCart";
    pub const QUERY: &str = include_str!("../../../graphql/storefront/queries/cart_create.graphql");

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineInput {
        pub merchandise_id: String,
        pub quantity: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CreateCheckoutCartCartCreate>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateCheckoutCartCartCreate {
        pub cart: Option<CreateCheckoutCartCartCreateCart>,
        pub user_errors: Vec<CreateCheckoutCartCartCreateUserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateCheckoutCartCartCreateCart {
        pub id: String,
        pub checkout_url: String,
        pub total_quantity: i64,
        pub cost: CreateCheckoutCartCartCreateCartCost,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateCheckoutCartCartCreateCartCost {
        pub total_amount: MoneyFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreateCheckoutCartCartCreateUserErrors {
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}

graphql_operation!(CreateCheckoutCart, create_checkout_cart);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_carry_their_fragments() {
        assert!(get_products::QUERY.contains("fragment CatalogProduct on Product"));
        assert!(get_products::QUERY.contains("fragment CatalogVariant on ProductVariant"));
        assert!(get_collection_by_handle::QUERY.contains("fragment CatalogProduct"));
        assert!(get_product_variants::QUERY.contains("fragment CatalogVariant"));
        assert!(!get_product_variants::QUERY.contains("fragment CatalogProduct"));
        assert!(!get_page_by_handle::QUERY.contains("fragment"));
    }

    #[test]
    fn test_build_query_names_operation() {
        let body = GetProduct::build_query(get_product::Variables {
            id: "gid://shopify/Product/42".to_string(),
        });
        assert_eq!(body.operation_name, "GetProduct");
        assert!(body.query.starts_with("query GetProduct($id: ID!)"));
    }
}
