//! Collection and content page conversion functions.

use crate::shopify::types::{Collection, Page};

use super::super::queries::{get_collection_by_handle, get_page_by_handle};
use super::products::{convert_image, convert_products};

pub fn convert_collection(
    collection: get_collection_by_handle::GetCollectionByHandleCollection,
) -> Collection {
    Collection {
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
        products: convert_products(collection.products),
    }
}

pub fn convert_page(page: get_page_by_handle::GetPageByHandlePage) -> Page {
    Page {
        handle: page.handle,
        title: page.title,
        body: page.body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_collection() {
        let data: get_collection_by_handle::ResponseData = serde_json::from_str(
            r#"{
                "collection": {
                    "id": "gid://shopify/Collection/9",
                    "handle": "core",
                    "title": "Core",
                    "description": "Everyday pieces.",
                    "image": { "url": "https://cdn.shopify.com/core.png", "altText": null },
                    "products": { "edges": [{ "node": {
                        "id": "gid://shopify/Product/7",
                        "handle": "dad-hat",
                        "title": "Dad Hat",
                        "description": "",
                        "tags": [],
                        "availableForSale": true,
                        "images": { "edges": [] },
                        "options": [{ "name": "Title", "optionValues": [{ "name": "Default Title" }] }],
                        "variants": { "edges": [{ "node": {
                            "id": "gid://shopify/ProductVariant/701",
                            "title": "Default Title",
                            "availableForSale": true,
                            "price": { "amount": "28.0", "currencyCode": "USD" },
                            "selectedOptions": [{ "name": "Title", "value": "Default Title" }]
                        }}]}
                    }}]}
                }
            }"#,
        )
        .unwrap();

        let collection = convert_collection(data.collection.unwrap());
        assert_eq!(collection.handle, "core");
        assert_eq!(
            collection.image.unwrap().url,
            "https://cdn.shopify.com/core.png"
        );
        assert_eq!(collection.products.len(), 1);
        assert_eq!(collection.products[0].handle, "dad-hat");
        assert!(collection.products[0].sizes().is_empty());
    }

    #[test]
    fn test_missing_collection_deserializes_to_none() {
        let data: get_collection_by_handle::ResponseData =
            serde_json::from_str(r#"{ "collection": null }"#).unwrap();
        assert!(data.collection.is_none());
    }

    #[test]
    fn test_convert_page() {
        let data: get_page_by_handle::ResponseData = serde_json::from_str(
            r#"{ "page": { "handle": "brand-story", "title": "Our Story", "body": "<p>Grown in Oakland.</p>" } }"#,
        )
        .unwrap();

        let page = convert_page(data.page.unwrap());
        assert_eq!(page.title, "Our Story");
        assert_eq!(page.body, "<p>Grown in Oakland.</p>");
    }
}
