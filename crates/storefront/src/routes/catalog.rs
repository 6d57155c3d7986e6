//! Catalog route handlers.
//!
//! Read-only JSON views of products, collections and content pages, fetched
//! from Shopify on every request. A product view carries what add-to-cart
//! needs: the product ID, its price and its sizes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use naya_merch_core::{Money, ProductId};

use crate::error::{AppError, Result};
use crate::extract::AppQuery;
use crate::shopify::{Collection, Image, MAX_PRODUCT_PAGE_SIZE, Page, Product, ProductVariant};
use crate::state::AppState;

/// Products listed when no limit is given.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 50;

/// Image display data.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Variant display data.
#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub size: Option<String>,
    pub available_for_sale: bool,
    pub price: Money,
}

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub available_for_sale: bool,
    /// First variant's price.
    pub price: Option<Money>,
    pub image: Option<String>,
    /// Second image, falling back to the first.
    pub hover_image: Option<String>,
    pub images: Vec<ImageView>,
    pub sizes: Vec<String>,
    pub variants: Vec<VariantView>,
}

/// Collection display data.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<ImageView>,
    pub products: Vec<ProductView>,
}

/// Content page display data.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub handle: String,
    pub title: String,
    pub body: String,
}

fn image_view(image: &Image, fallback_alt: &str) -> ImageView {
    ImageView {
        url: image.url.clone(),
        alt: image
            .alt_text
            .clone()
            .unwrap_or_else(|| fallback_alt.to_string()),
    }
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_gid(),
            title: variant.title.clone(),
            size: variant.size().map(String::from),
            available_for_sale: variant.available_for_sale,
            price: variant.price.clone(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let image = product.images.first().map(|i| i.url.clone());
        let hover_image = product
            .images
            .get(1)
            .map(|i| i.url.clone())
            .or_else(|| image.clone());

        Self {
            id: product.id.to_gid(),
            handle: product.handle.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            tags: product.tags.clone(),
            available_for_sale: product.available_for_sale,
            price: product.price().cloned(),
            image,
            hover_image,
            images: product
                .images
                .iter()
                .map(|i| image_view(i, &product.title))
                .collect(),
            sizes: product.sizes().to_vec(),
            variants: product.variants.iter().map(VariantView::from).collect(),
        }
    }
}

impl From<&Collection> for CollectionView {
    fn from(collection: &Collection) -> Self {
        Self {
            handle: collection.handle.clone(),
            title: collection.title.clone(),
            description: collection.description.clone(),
            image: collection
                .image
                .as_ref()
                .map(|i| image_view(i, &collection.title)),
            products: collection.products.iter().map(ProductView::from).collect(),
        }
    }
}

impl From<Page> for PageView {
    fn from(page: Page) -> Self {
        Self {
            handle: page.handle,
            title: page.title,
            body: page.body,
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub limit: Option<u32>,
}

/// List products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProductsQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PRODUCT_LIMIT)
        .clamp(1, MAX_PRODUCT_PAGE_SIZE);

    let products = state.backend().products(limit).await?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Show one product.
///
/// Accepts a bare numeric ID or a URL-encoded global ID.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product_id = ProductId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let product = state.backend().product(&product_id).await?;
    Ok(Json(ProductView::from(&product)))
}

/// Show a collection and its products.
#[instrument(skip(state))]
pub async fn collection(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<CollectionView>> {
    let collection = state.backend().collection(&handle).await?;
    Ok(Json(CollectionView::from(&collection)))
}

/// Show a content page.
#[instrument(skip(state))]
pub async fn page(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<PageView>> {
    let page = state.backend().page(&handle).await?;
    Ok(Json(PageView::from(page)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use naya_merch_core::VariantId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::shopify::{ProductOption, SelectedOption};

    fn image(url: &str, alt: Option<&str>) -> Image {
        Image {
            url: url.to_string(),
            alt_text: alt.map(String::from),
        }
    }

    fn tee(images: Vec<Image>) -> Product {
        Product {
            id: ProductId::parse("42").unwrap(),
            handle: "logo-tee".to_string(),
            title: "Logo Tee".to_string(),
            description: String::new(),
            tags: vec![],
            available_for_sale: true,
            images,
            options: vec![ProductOption {
                name: "Size".to_string(),
                values: vec!["S".to_string(), "M".to_string()],
            }],
            variants: vec![ProductVariant {
                id: VariantId::parse("4201").unwrap(),
                title: "S".to_string(),
                available_for_sale: true,
                price: Money::new(Decimal::new(35, 0), "USD"),
                selected_options: vec![SelectedOption {
                    name: "Size".to_string(),
                    value: "S".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_product_view() {
        let view = ProductView::from(&tee(vec![
            image("https://cdn.shopify.com/front.png", Some("Front")),
            image("https://cdn.shopify.com/back.png", None),
        ]));

        assert_eq!(view.id, "gid://shopify/Product/42");
        assert_eq!(view.price.unwrap().amount, Decimal::new(35, 0));
        assert_eq!(view.image.as_deref(), Some("https://cdn.shopify.com/front.png"));
        assert_eq!(view.hover_image.as_deref(), Some("https://cdn.shopify.com/back.png"));
        assert_eq!(view.images[1].alt, "Logo Tee");
        assert_eq!(view.sizes, vec!["S", "M"]);
        assert_eq!(view.variants[0].id, "gid://shopify/ProductVariant/4201");
        assert_eq!(view.variants[0].size.as_deref(), Some("S"));
    }

    #[test]
    fn test_hover_image_falls_back_to_first() {
        let view = ProductView::from(&tee(vec![image("https://cdn.shopify.com/front.png", None)]));
        assert_eq!(view.hover_image, view.image);

        let view = ProductView::from(&tee(vec![]));
        assert!(view.image.is_none());
        assert!(view.hover_image.is_none());
    }
}
