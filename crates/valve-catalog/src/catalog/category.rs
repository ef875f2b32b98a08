//! Product categories.

use serde::{Deserialize, Serialize};

use super::fields::{blank_as_none, null_as_default};
use super::ProductType;
use crate::ids::{CategoryId, ProductId};
use crate::slug::slugify;

/// A top-level grouping of products (e.g. "Válvulas Industriais").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL slug, unique across the catalog.
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Banner image.
    #[serde(
        default,
        alias = "image_url",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    /// Products in display order.
    #[serde(default, alias = "types", deserialize_with = "null_as_default")]
    pub products: Vec<ProductType>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            image: None,
            products: Vec::new(),
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_product(mut self, product: ProductType) -> Self {
        self.products.push(product);
        self
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&ProductType> {
        self.products.iter().find(|p| p.slug == slug)
    }

    pub fn product_by_id(&self, id: &ProductId) -> Option<&ProductType> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Active products in display order.
    pub fn active_products(&self) -> impl Iterator<Item = &ProductType> {
        self.products.iter().filter(|p| p.is_active)
    }

    /// Fold REST-only fields of every product into the canonical ones.
    pub fn normalize(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.name);
        }
        for product in &mut self.products {
            product.normalize();
        }
    }
}
