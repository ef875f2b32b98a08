//! Where catalog data comes from.
//!
//! Consumers depend on [`CatalogRepository`] only; the bundled seed data,
//! a JSON export and a REST listing all load through the same interface.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::{Category, ProductType};
use crate::error::{CatalogError, CatalogResult};
use crate::ids::ProductId;
use crate::seed::seed_categories;

/// Read access to a catalog.
pub trait CatalogRepository {
    /// All categories with their products, in display order.
    fn load_categories(&self) -> CatalogResult<Vec<Category>>;

    /// The first product anywhere in the catalog with this slug.
    fn load_product_by_slug(&self, slug: &str) -> CatalogResult<ProductType> {
        self.load_categories()?
            .into_iter()
            .flat_map(|c| c.products)
            .find(|p| p.slug == slug)
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))
    }

    fn load_category_by_slug(&self, slug: &str) -> CatalogResult<Category> {
        self.load_categories()?
            .into_iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))
    }

    /// A product addressed by category and product slug, as in page URLs.
    fn load_product(&self, category_slug: &str, product_slug: &str) -> CatalogResult<ProductType> {
        self.load_category_by_slug(category_slug)?
            .products
            .into_iter()
            .find(|p| p.slug == product_slug)
            .ok_or_else(|| {
                CatalogError::ProductNotFound(format!("{}/{}", category_slug, product_slug))
            })
    }

    fn load_product_by_id(&self, id: &ProductId) -> CatalogResult<ProductType> {
        self.load_categories()?
            .into_iter()
            .flat_map(|c| c.products)
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// Active products of one category, or of the whole catalog.
    fn load_products(&self, category_slug: Option<&str>) -> CatalogResult<Vec<ProductType>> {
        let categories = match category_slug {
            Some(slug) => vec![self.load_category_by_slug(slug)?],
            None => self.load_categories()?,
        };
        Ok(categories
            .into_iter()
            .flat_map(|c| c.products)
            .filter(|p| p.is_active)
            .collect())
    }
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    categories: Vec<Category>,
}

impl StaticCatalog {
    /// The bundled catalog.
    pub fn seed() -> Self {
        Self::from_categories(seed_categories())
    }

    pub fn from_categories(mut categories: Vec<Category>) -> Self {
        for category in &mut categories {
            category.normalize();
        }
        Self { categories }
    }

    /// Decode a category listing (bare array or paginated envelope).
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(Self::from_categories(parse_listing(json)?))
    }

    pub fn from_value(value: Value) -> CatalogResult<Self> {
        Ok(Self::from_categories(listing_from_value(value)?))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Borrowing lookup by product slug across all categories.
    pub fn find_product_by_slug(&self, slug: &str) -> Option<(&Category, &ProductType)> {
        self.categories
            .iter()
            .find_map(|c| c.product_by_slug(slug).map(|p| (c, p)))
    }

    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }
}

impl CatalogRepository for StaticCatalog {
    fn load_categories(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn load_product_by_slug(&self, slug: &str) -> CatalogResult<ProductType> {
        self.find_product_by_slug(slug)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))
    }
}

/// Items of a listing response.
///
/// The backend answers either with a bare array or with a paginated
/// `{"count": .., "results": [..]}` envelope. Anything else is treated as
/// an empty listing.
pub fn normalize_listing(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Decode every item of a listing response.
pub fn parse_listing<T: DeserializeOwned>(json: &str) -> CatalogResult<Vec<T>> {
    let value: Value = serde_json::from_str(json)?;
    listing_from_value(value)
}

fn listing_from_value<T: DeserializeOwned>(value: Value) -> CatalogResult<Vec<T>> {
    normalize_listing(value)
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(CatalogError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_lookups() {
        let catalog = StaticCatalog::seed();
        assert_eq!(catalog.load_categories().unwrap().len(), 2);

        let product = catalog.load_product_by_slug("valvula-gaveta").unwrap();
        assert_eq!(product.name, "Válvula de Gaveta");

        let product = catalog.load_product("conexoes-tubulares", "tes-90").unwrap();
        assert_eq!(product.id.as_str(), "5");

        let product = catalog.load_product_by_id(&ProductId::new("3")).unwrap();
        assert_eq!(product.slug, "valvula-retencao");
    }

    #[test]
    fn test_missing_lookups() {
        let catalog = StaticCatalog::seed();
        assert!(matches!(
            catalog.load_product_by_slug("nope"),
            Err(CatalogError::ProductNotFound(_))
        ));
        assert!(matches!(
            catalog.load_category_by_slug("nope"),
            Err(CatalogError::CategoryNotFound(_))
        ));
        assert!(matches!(
            catalog.load_product("valvulas-industriais", "flanges"),
            Err(CatalogError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_load_products_filters() {
        let catalog = StaticCatalog::seed();
        assert_eq!(catalog.load_products(None).unwrap().len(), 5);
        assert_eq!(
            catalog
                .load_products(Some("valvulas-industriais"))
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn test_normalize_listing() {
        assert_eq!(normalize_listing(json!([1, 2])).len(), 2);
        assert_eq!(normalize_listing(json!({"count": 1, "results": [1]})).len(), 1);
        assert!(normalize_listing(json!({"detail": "oops"})).is_empty());
        assert!(normalize_listing(json!(null)).is_empty());
    }

    #[test]
    fn test_from_paginated_json() {
        let json = r#"{"count": 1, "results": [
            {"id": 9, "name": "Válvulas", "slug": "valvulas", "image_url": "/v.png",
             "products": [{"id": 1, "title": "Esfera", "slug": "esfera",
                           "image_url": "/esfera.png", "is_active": false}]}
        ]}"#;
        let catalog = StaticCatalog::from_json_str(json).unwrap();
        let category = &catalog.categories()[0];
        assert_eq!(category.image.as_deref(), Some("/v.png"));
        assert_eq!(category.products[0].image(), Some("/esfera.png"));
        assert!(catalog.load_products(None).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        assert!(matches!(
            StaticCatalog::from_json_str("{not json"),
            Err(CatalogError::SerializationError(_))
        ));
    }
}
