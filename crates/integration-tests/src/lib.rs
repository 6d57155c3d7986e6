//! Integration tests for the NAYA merch storefront.
//!
//! Tests drive the full axum router in-process with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between
//! requests like a browser would. Shopify is replaced by [`FakeBackend`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p naya-merch-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use naya_merch_core::{CartId, Money, ProductId, VariantId};
use naya_merch_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use naya_merch_storefront::middleware::SESSION_COOKIE_NAME;
use naya_merch_storefront::routes;
use naya_merch_storefront::shopify::{
    CartLineInput, CheckoutSession, Collection, CommerceBackend, Image, Page, Product,
    ProductOption, ProductVariant, SelectedOption, ShopifyError,
};
use naya_merch_storefront::state::AppState;

/// Checkout URL the fake backend hands out.
pub const FAKE_CHECKOUT_URL: &str = "https://naya.myshopify.com/cart/c/fake-checkout";

/// How the fake backend answers checkout requests.
#[derive(Debug, Clone, Default)]
pub enum CheckoutBehavior {
    /// Create a session totalling `unit_price` per unit.
    #[default]
    Succeed,
    /// Reject with Shopify user errors.
    Reject(String),
    /// Fail as if Shopify were unreachable.
    Unreachable,
}

/// In-memory commerce backend recording every call.
#[derive(Default)]
pub struct FakeBackend {
    products: Vec<Product>,
    collections: Vec<Collection>,
    pages: Vec<Page>,
    unit_price: Decimal,
    behavior: CheckoutBehavior,
    catalog_unreachable: bool,
    lookups: AtomicUsize,
    created: Mutex<Vec<Vec<CartLineInput>>>,
}

impl FakeBackend {
    /// Empty catalog; every unit costs `unit_price`.
    #[must_use]
    pub fn new(unit_price: Decimal) -> Self {
        Self {
            unit_price,
            ..Self::default()
        }
    }

    /// Add a product with `(variant id, size, available)` variants.
    ///
    /// The product is titled `Product <id>` with handle `product-<id>` and
    /// every variant costs the backend's unit price.
    #[must_use]
    pub fn with_product(mut self, product_id: &str, variants: &[(&str, &str, bool)]) -> Self {
        let price = Money::new(self.unit_price, "USD");
        let variants: Vec<ProductVariant> = variants
            .iter()
            .map(|(id, size, available)| ProductVariant {
                id: VariantId::parse(id).unwrap(),
                title: (*size).to_string(),
                available_for_sale: *available,
                price: price.clone(),
                selected_options: vec![SelectedOption {
                    name: "Size".to_string(),
                    value: (*size).to_string(),
                }],
            })
            .collect();

        self.products.push(Product {
            id: ProductId::parse(product_id).unwrap(),
            handle: format!("product-{product_id}"),
            title: format!("Product {product_id}"),
            description: String::new(),
            tags: vec![],
            available_for_sale: variants.iter().any(|v| v.available_for_sale),
            images: vec![Image {
                url: format!("https://cdn.example.com/{product_id}.png"),
                alt_text: None,
            }],
            options: vec![ProductOption {
                name: "Size".to_string(),
                values: variants.iter().map(|v| v.title.clone()).collect(),
            }],
            variants,
        });
        self
    }

    /// Add a collection holding previously added products.
    #[must_use]
    pub fn with_collection(mut self, handle: &str, product_ids: &[&str]) -> Self {
        let products = product_ids
            .iter()
            .filter_map(|id| self.find(&ProductId::parse(id).unwrap()).cloned())
            .collect();
        self.collections.push(Collection {
            handle: handle.to_string(),
            title: handle.to_uppercase(),
            description: String::new(),
            image: None,
            products,
        });
        self
    }

    /// Add a content page.
    #[must_use]
    pub fn with_page(mut self, handle: &str, title: &str, body: &str) -> Self {
        self.pages.push(Page {
            handle: handle.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        self
    }

    /// Fail every catalog read as if Shopify were unreachable.
    #[must_use]
    pub fn with_catalog_unreachable(mut self) -> Self {
        self.catalog_unreachable = true;
        self
    }

    /// Change how checkout requests are answered.
    #[must_use]
    pub fn with_behavior(mut self, behavior: CheckoutBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Number of variant lookups made.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Every checkout request received, in order.
    pub fn checkout_requests(&self) -> Vec<Vec<CartLineInput>> {
        self.created.lock().unwrap().clone()
    }

    fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == product_id)
    }

    fn catalog_read(&self) -> Result<(), ShopifyError> {
        if self.catalog_unreachable {
            return Err(ShopifyError::InvalidResponse("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommerceBackend for FakeBackend {
    async fn products(&self, first: u32) -> Result<Vec<Product>, ShopifyError> {
        self.catalog_read()?;
        Ok(self
            .products
            .iter()
            .take(usize::try_from(first).unwrap())
            .cloned()
            .collect())
    }

    async fn product(&self, product_id: &ProductId) -> Result<Product, ShopifyError> {
        self.catalog_read()?;
        self.find(product_id)
            .cloned()
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {product_id}")))
    }

    async fn collection(&self, handle: &str) -> Result<Collection, ShopifyError> {
        self.catalog_read()?;
        self.collections
            .iter()
            .find(|c| c.handle == handle)
            .cloned()
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))
    }

    async fn page(&self, handle: &str) -> Result<Page, ShopifyError> {
        self.catalog_read()?;
        self.pages
            .iter()
            .find(|p| p.handle == handle)
            .cloned()
            .ok_or_else(|| ShopifyError::NotFound(format!("Page not found: {handle}")))
    }

    async fn product_variants(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.find(product_id)
            .map(|p| p.variants.clone())
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {product_id}")))
    }

    async fn create_checkout(
        &self,
        lines: Vec<CartLineInput>,
    ) -> Result<CheckoutSession, ShopifyError> {
        self.created.lock().unwrap().push(lines.clone());
        match &self.behavior {
            CheckoutBehavior::Succeed => {
                let units: u64 = lines.iter().map(|l| u64::from(l.quantity)).sum();
                Ok(CheckoutSession {
                    id: CartId::parse("gid://shopify/Cart/fake-checkout").unwrap(),
                    checkout_url: FAKE_CHECKOUT_URL.to_string(),
                    total_quantity: units,
                    total: Money::new(self.unit_price * Decimal::from(units), "USD"),
                })
            }
            CheckoutBehavior::Reject(message) => Err(ShopifyError::UserError(message.clone())),
            CheckoutBehavior::Unreachable => Err(ShopifyError::InvalidResponse(
                "connection reset".to_string(),
            )),
        }
    }
}

/// Configuration suitable for in-process tests.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        log_json: false,
        shopify: ShopifyStorefrontConfig {
            store: "naya.myshopify.com".to_string(),
            api_version: "2025-01".to_string(),
            storefront_public_token: "public".to_string(),
            storefront_private_token: None,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Response captured by [`TestApp`].
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A storefront router plus a browser-like cookie.
pub struct TestApp {
    router: Router,
    backend: Arc<FakeBackend>,
    cookie: Option<String>,
}

impl TestApp {
    /// Build the storefront around a fake backend.
    #[must_use]
    pub fn new(backend: FakeBackend) -> Self {
        let backend = Arc::new(backend);
        let state = AppState::with_backend(test_config(), backend.clone());
        Self {
            router: routes::app(state),
            backend,
            cookie: None,
        }
    }

    /// A second shopper on the same app, starting without a session.
    #[must_use]
    pub fn new_shopper(&self) -> Self {
        Self {
            router: self.router.clone(),
            backend: self.backend.clone(),
            cookie: None,
        }
    }

    /// The fake backend behind the app.
    #[must_use]
    pub fn backend(&self) -> &FakeBackend {
        &self.backend
    }

    /// Send a request, keeping any session cookie the app sets.
    pub async fn request(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(SESSION_COOKIE_NAME))
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET` a path.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    /// `POST` JSON to a path.
    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    /// `POST` with no body.
    pub async fn post_empty(&mut self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None).await
    }

    /// Add a product to the cart.
    pub async fn add(&mut self, id: &str, price: &str, size: Option<&str>) -> TestResponse {
        self.post(
            "/cart/add",
            serde_json::json!({
                "id": id,
                "name": format!("Product {id}"),
                "price": price,
                "image": format!("https://cdn.example.com/{id}.png"),
                "size": size,
            }),
        )
        .await
    }
}
