//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` for the query/response envelope with `reqwest` 0.13
//! for HTTP. Nothing is cached: catalog reads and availability are always
//! current.

mod conversions;

pub mod queries;

use std::sync::Arc;

use async_trait::async_trait;
use graphql_client::{GraphQLQuery, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use naya_merch_core::ProductId;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    CartLineInput, CheckoutSession, Collection, Page, Product, ProductVariant,
};
use crate::shopify::{CommerceBackend, GraphQLError, ShopifyError};

use conversions::{
    convert_checkout_session, convert_collection, convert_page, convert_product,
    convert_product_variants, convert_products, convert_user_error,
};
use queries::{
    CreateCheckoutCart, GetCollectionByHandle, GetPageByHandle, GetProduct, GetProductVariants,
    GetProducts, create_checkout_cart, get_collection_by_handle, get_page_by_handle, get_product,
    get_product_variants, get_products,
};

/// Number of variants fetched per product.
const VARIANT_PAGE_SIZE: i64 = 50;

/// Number of products fetched per collection.
const COLLECTION_PAGE_SIZE: i64 = 50;

/// Most products the Storefront API returns in one page.
pub const MAX_PRODUCT_PAGE_SIZE: u32 = 250;

/// Header for server-side private access tokens.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Header for public (browser-safe) access tokens.
const PUBLIC_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides catalog reads, variant lookup and checkout cart creation.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: AccessToken,
}

/// Which Storefront API token the client authenticates with.
enum AccessToken {
    Private(SecretString),
    Public(String),
}

impl AccessToken {
    const fn header_name(&self) -> &'static str {
        match self {
            Self::Private(_) => PRIVATE_TOKEN_HEADER,
            Self::Public(_) => PUBLIC_TOKEN_HEADER,
        }
    }

    fn value(&self) -> &str {
        match self {
            Self::Private(token) => token.expose_secret(),
            Self::Public(token) => token,
        }
    }
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// Prefers the private token when one is configured.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let access_token = config.storefront_private_token.as_ref().map_or_else(
            || AccessToken::Public(config.storefront_public_token.clone()),
            |token| AccessToken::Private(token.clone()),
        );

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_endpoint(),
                access_token,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                self.inner.access_token.header_name(),
                self.inner.access_token.value(),
            )
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            ))]));
        }

        parse_response::<Q::ResponseData>(&response_text)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every variant of a product (first 50).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_variants(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        let variables = get_product_variants::Variables {
            id: product_id.to_gid(),
            variant_count: VARIANT_PAGE_SIZE,
        };

        let data = self.execute::<GetProductVariants>(variables).await?;

        let product = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {product_id}")))?;

        let title = product.title.clone();
        let variants = convert_product_variants(product);
        debug!(title = %title, count = variants.len(), "Fetched product variants");

        Ok(variants)
    }

    /// Get the first `first` products, capped at [`MAX_PRODUCT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, first: u32) -> Result<Vec<Product>, ShopifyError> {
        let variables = get_products::Variables {
            first: i64::from(first.clamp(1, MAX_PRODUCT_PAGE_SIZE)),
        };

        let data = self.execute::<GetProducts>(variables).await?;
        let products = convert_products(data.products);
        debug!(count = products.len(), "Fetched products");

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ShopifyError> {
        let variables = get_product::Variables {
            id: product_id.to_gid(),
        };

        let data = self.execute::<GetProduct>(variables).await?;

        data.product
            .and_then(convert_product)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {product_id}")))
    }

    // =========================================================================
    // Collection and Content Methods
    // =========================================================================

    /// Get a collection and its first 50 products by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the collection does not exist, or
    /// an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(&self, handle: &str) -> Result<Collection, ShopifyError> {
        let variables = get_collection_by_handle::Variables {
            handle: handle.to_string(),
            product_count: COLLECTION_PAGE_SIZE,
        };

        let data = self.execute::<GetCollectionByHandle>(variables).await?;

        let collection = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        debug!(id = %collection.id, "Fetched collection");
        Ok(convert_collection(collection))
    }

    /// Get a content page by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the page does not exist or is not
    /// published, or an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_page_by_handle(&self, handle: &str) -> Result<Page, ShopifyError> {
        let variables = get_page_by_handle::Variables {
            handle: handle.to_string(),
        };

        let data = self.execute::<GetPageByHandle>(variables).await?;

        data.page
            .map(convert_page)
            .ok_or_else(|| ShopifyError::NotFound(format!("Page not found: {handle}")))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Create a cart from resolved lines and return its checkout session.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the lines, or an
    /// error if the API request fails.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> Result<CheckoutSession, ShopifyError> {
        let variables = create_checkout_cart::Variables {
            input: create_checkout_cart::CartInput {
                lines: lines
                    .into_iter()
                    .map(|line| create_checkout_cart::CartLineInput {
                        merchandise_id: line.merchandise_id.to_gid(),
                        quantity: Some(i64::from(line.quantity)),
                    })
                    .collect(),
            },
        };

        let data = self.execute::<CreateCheckoutCart>(variables).await?;

        if let Some(result) = data.cart_create {
            // Check for user errors
            if !result.user_errors.is_empty() {
                return Err(ShopifyError::UserError(
                    result
                        .user_errors
                        .into_iter()
                        .map(|e| convert_user_error(e).to_string())
                        .collect::<Vec<_>>()
                        .join("; "),
                ));
            }

            if let Some(cart) = result.cart {
                return convert_checkout_session(cart);
            }
        }

        Err(ShopifyError::GraphQL(vec![GraphQLError::message(
            "Failed to create cart",
        )]))
    }
}

#[async_trait]
impl CommerceBackend for StorefrontClient {
    async fn products(&self, first: u32) -> Result<Vec<Product>, ShopifyError> {
        self.get_products(first).await
    }

    async fn product(&self, product_id: &ProductId) -> Result<Product, ShopifyError> {
        self.get_product(product_id).await
    }

    async fn collection(&self, handle: &str) -> Result<Collection, ShopifyError> {
        self.get_collection_by_handle(handle).await
    }

    async fn page(&self, handle: &str) -> Result<Page, ShopifyError> {
        self.get_page_by_handle(handle).await
    }

    async fn product_variants(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        self.get_product_variants(product_id).await
    }

    async fn create_checkout(
        &self,
        lines: Vec<CartLineInput>,
    ) -> Result<CheckoutSession, ShopifyError> {
        self.create_cart(lines).await
    }
}

/// Parse a GraphQL response body, surfacing top-level errors.
fn parse_response<T>(response_text: &str) -> Result<T, ShopifyError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let response: Response<T> = match serde_json::from_str(response_text) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %truncate(response_text, 500),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    // Check for GraphQL errors
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, "GraphQL errors in response");

        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(convert_graphql_error).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            body = %truncate(response_text, 500),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
    })
}

fn convert_graphql_error(e: graphql_client::Error) -> GraphQLError {
    let path = e.path.filter(|p| !p.is_empty()).map(|fragments| {
        fragments
            .iter()
            .map(|fragment| match fragment {
                graphql_client::PathFragment::Key(key) => key.clone(),
                graphql_client::PathFragment::Index(i) => i.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    });

    GraphQLError {
        message: e.message,
        path,
        location: e
            .locations
            .and_then(|locs| {
                locs.first()
                    .map(|l| (i64::from(l.line), i64::from(l.column)))
            }),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
