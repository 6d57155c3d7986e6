//! Product type conversion functions.

use tracing::warn;

use naya_merch_core::{Money, ProductId, VariantId};

use crate::shopify::types::{Image, Product, ProductOption, ProductVariant, SelectedOption};

use super::super::queries::catalog::{self, Connection};
use super::super::queries::get_product_variants;

/// Convert a product's variant edges into domain variants.
///
/// Variants without a usable ID are skipped with a warning rather than
/// failing the whole product.
pub fn convert_product_variants(
    product: get_product_variants::GetProductVariantsProduct,
) -> Vec<ProductVariant> {
    product
        .variants
        .into_nodes()
        .filter_map(convert_variant)
        .collect()
}

/// Convert a page of products, skipping any without an ID.
pub fn convert_products(products: Connection<catalog::ProductFields>) -> Vec<Product> {
    products.into_nodes().filter_map(convert_product).collect()
}

/// Convert a catalog product.
///
/// Returns `None` when Shopify sent a product without an ID.
pub fn convert_product(product: catalog::ProductFields) -> Option<Product> {
    let Ok(id) = ProductId::parse(&product.id) else {
        warn!(handle = %product.handle, "Skipping product with empty ID");
        return None;
    };

    Some(Product {
        id,
        handle: product.handle,
        title: product.title,
        description: product.description,
        tags: product.tags,
        available_for_sale: product.available_for_sale,
        images: product.images.into_nodes().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|option| ProductOption {
                name: option.name,
                values: option.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        variants: product
            .variants
            .into_nodes()
            .filter_map(convert_variant)
            .collect(),
    })
}

pub fn convert_image(image: catalog::ImageFields) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
    }
}

fn convert_variant(node: catalog::VariantFields) -> Option<ProductVariant> {
    let Ok(id) = VariantId::parse(&node.id) else {
        warn!(title = %node.title, "Skipping variant with empty ID");
        return None;
    };

    Some(ProductVariant {
        id,
        title: node.title,
        available_for_sale: node.available_for_sale,
        price: Money::new(node.price.amount, node.price.currency_code),
        selected_options: node
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use super::super::super::queries::{get_product, get_products};

    fn parse(json: &str) -> get_product_variants::ResponseData {
        serde_json::from_str(json).unwrap()
    }

    const HOODIE: &str = r#"{
        "id": "gid://shopify/Product/42",
        "handle": "kale-camo-hoodie",
        "title": "Kale Camo Hoodie",
        "description": "Heavyweight fleece.",
        "tags": ["outerwear", "camo"],
        "availableForSale": true,
        "images": { "edges": [
            { "node": { "url": "https://cdn.shopify.com/hoodie-front.png", "altText": "Front" } },
            { "node": { "url": "https://cdn.shopify.com/hoodie-back.png", "altText": null } }
        ]},
        "options": [{ "name": "Size", "optionValues": [{ "name": "S" }, { "name": "M" }] }],
        "variants": { "edges": [
            { "node": {
                "id": "gid://shopify/ProductVariant/1001",
                "title": "S",
                "availableForSale": false,
                "price": { "amount": "35.0", "currencyCode": "USD" },
                "selectedOptions": [{ "name": "Size", "value": "S" }]
            }},
            { "node": {
                "id": "gid://shopify/ProductVariant/1002",
                "title": "M",
                "availableForSale": true,
                "price": { "amount": "35.0", "currencyCode": "USD" },
                "selectedOptions": [{ "name": "Size", "value": "M" }]
            }}
        ]}
    }"#;

    #[test]
    fn test_convert_product_variants() {
        let data = parse(&format!(
            r#"{{ "product": {{ "id": "gid://shopify/Product/42", "title": "Kale Camo Hoodie", "variants": {} }} }}"#,
            serde_json::from_str::<serde_json::Value>(HOODIE).unwrap()["variants"]
        ));

        let variants = convert_product_variants(data.product.unwrap());
        assert_eq!(variants.len(), 2);
        assert_eq!(
            variants[0].id.as_str(),
            "gid://shopify/ProductVariant/1001"
        );
        assert!(!variants[0].available_for_sale);
        assert_eq!(variants[1].size(), Some("M"));
        assert!(variants[1].available_for_sale);
        assert_eq!(variants[1].price.amount, Decimal::new(35, 0));
    }

    #[test]
    fn test_convert_skips_variant_without_id() {
        let data = parse(
            r#"{
                "product": {
                    "id": "gid://shopify/Product/42",
                    "title": "Hat",
                    "variants": { "edges": [
                        { "node": {
                            "id": "",
                            "title": "Broken",
                            "availableForSale": true,
                            "price": { "amount": "18.0", "currencyCode": "USD" },
                            "selectedOptions": []
                        }},
                        { "node": {
                            "id": "gid://shopify/ProductVariant/7",
                            "title": "Default Title",
                            "availableForSale": true,
                            "price": { "amount": "18.0", "currencyCode": "USD" },
                            "selectedOptions": [{ "name": "Title", "value": "Default Title" }]
                        }}
                    ]}
                }
            }"#,
        );

        let variants = convert_product_variants(data.product.unwrap());
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].title, "Default Title");
    }

    #[test]
    fn test_missing_product_deserializes_to_none() {
        let data = parse(r#"{ "product": null }"#);
        assert!(data.product.is_none());
    }

    #[test]
    fn test_convert_product() {
        let data: get_product::ResponseData =
            serde_json::from_str(&format!(r#"{{ "product": {HOODIE} }}"#)).unwrap();

        let product = convert_product(data.product.unwrap()).unwrap();
        assert_eq!(product.id, ProductId::parse("42").unwrap());
        assert_eq!(product.handle, "kale-camo-hoodie");
        assert_eq!(product.tags, vec!["outerwear", "camo"]);
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.images[0].alt_text.as_deref(), Some("Front"));
        assert_eq!(product.sizes(), ["S", "M"]);
        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.price().unwrap().to_string(), "35.00 USD");
    }

    #[test]
    fn test_convert_products_skips_product_without_id() {
        let data: get_products::ResponseData = serde_json::from_str(&format!(
            r#"{{ "products": {{ "edges": [
                {{ "node": {HOODIE} }},
                {{ "node": {} }}
            ]}} }}"#,
            HOODIE.replace("gid://shopify/Product/42", "")
        ))
        .unwrap();

        let products = convert_products(data.products);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Kale Camo Hoodie");
    }
}
