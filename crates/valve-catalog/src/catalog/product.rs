//! Product types, variants and size entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::{blank_as_none, null_as_default, size_list, Specifications};
use super::size::{compare_sizes, smallest_size};
use crate::ids::ProductId;
use crate::slug::slugify;

/// One orderable size of a product or variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeEntry {
    /// Free-text engineering size label (e.g. `1/2"`, `DN50`).
    #[serde(alias = "size_label")]
    pub size: String,
    /// Image shown for exactly this size. May be blank in imported data.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SizeEntry {
    pub fn new(size: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            image: image.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The image, or `None` when it is blank.
    pub fn image(&self) -> Option<&str> {
        non_blank(&self.image)
    }
}

/// A material or construction style of a product (e.g. "Inox").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Variant label; doubles as the variant's identity within a product.
    #[serde(rename = "type", alias = "name")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "size_list")]
    pub sizes: Vec<SizeEntry>,
    /// Image for a variant sold in one size only.
    #[serde(
        default,
        alias = "singleImage",
        alias = "image",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub single_image: Option<String>,
}

impl Variant {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: None,
            sizes: Vec::new(),
            single_image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>, image: impl Into<String>) -> Self {
        self.sizes.push(SizeEntry::new(size, image));
        self
    }

    pub fn with_single_image(mut self, image: impl Into<String>) -> Self {
        self.single_image = Some(image.into());
        self
    }

    pub fn size_entry(&self, size: &str) -> Option<&SizeEntry> {
        self.sizes.iter().find(|s| s.size == size)
    }

    /// Sizes in ascending size order.
    pub fn sorted_sizes(&self) -> Vec<&SizeEntry> {
        sorted_entries(&self.sizes)
    }

    pub fn smallest_size(&self) -> Option<&str> {
        smallest_size(self.sizes.iter().map(|s| s.size.as_str()))
    }
}

/// Shape of a catalog entry, derived from its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductShape {
    /// Has variants, each with its own sizes.
    Complex,
    /// Has sizes directly, no variants.
    Intermediate,
    /// Neither; shown with a single image.
    Simple,
}

impl ProductShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductShape::Complex => "complex",
            ProductShape::Intermediate => "intermediate",
            ProductShape::Simple => "simple",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "complex" => Some(ProductShape::Complex),
            "intermediate" => Some(ProductShape::Intermediate),
            "simple" => Some(ProductShape::Simple),
            _ => None,
        }
    }
}

impl fmt::Display for ProductShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product classified by shape, borrowing the data that shape uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductKind<'a> {
    Complex { variants: &'a [Variant] },
    Intermediate { sizes: &'a [SizeEntry] },
    Simple { image: Option<&'a str> },
}

impl ProductKind<'_> {
    pub fn shape(&self) -> ProductShape {
        match self {
            ProductKind::Complex { .. } => ProductShape::Complex,
            ProductKind::Intermediate { .. } => ProductShape::Intermediate,
            ProductKind::Simple { .. } => ProductShape::Simple,
        }
    }
}

/// A catalog entry: one valve or fitting model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductType {
    pub id: ProductId,
    /// Display name.
    #[serde(alias = "title")]
    pub name: String,
    /// URL slug, unique within its category.
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Fallback display image.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    /// Absolute image URL as sent by the REST backend; folded into `image`.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing)]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variants: Vec<Variant>,
    #[serde(
        default,
        deserialize_with = "size_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sizes: Vec<SizeEntry>,
    #[serde(default, skip_serializing_if = "Specifications::is_empty")]
    pub specifications: Specifications,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub applications: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub standards: Vec<String>,
    /// Inactive products are hidden from listings.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

impl ProductType {
    /// Create a simple product with no variants, sizes or image.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            image: None,
            image_url: None,
            variants: Vec::new(),
            sizes: Vec::new(),
            specifications: Specifications::new(),
            applications: Vec::new(),
            standards: Vec::new(),
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

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_size(mut self, size: impl Into<String>, image: impl Into<String>) -> Self {
        self.sizes.push(SizeEntry::new(size, image));
        self
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.specifications.insert(key, value);
        self
    }

    pub fn with_applications(mut self, items: &[&str]) -> Self {
        self.applications = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_standards(mut self, items: &[&str]) -> Self {
        self.standards = items.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Classify by shape. Variants win when data carries both lists.
    pub fn kind(&self) -> ProductKind<'_> {
        if !self.variants.is_empty() {
            ProductKind::Complex {
                variants: &self.variants,
            }
        } else if !self.sizes.is_empty() {
            ProductKind::Intermediate { sizes: &self.sizes }
        } else {
            ProductKind::Simple {
                image: self.image(),
            }
        }
    }

    pub fn shape(&self) -> ProductShape {
        self.kind().shape()
    }

    /// The product's own image, or `None` when blank.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().and_then(non_blank)
    }

    pub fn variant(&self, kind: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.kind == kind)
    }

    /// A top-level size entry by label.
    pub fn size_entry(&self, size: &str) -> Option<&SizeEntry> {
        self.sizes.iter().find(|s| s.size == size)
    }

    /// Top-level sizes in ascending size order.
    pub fn sorted_sizes(&self) -> Vec<&SizeEntry> {
        sorted_entries(&self.sizes)
    }

    /// Image for cards and listings.
    ///
    /// The product image when present; otherwise the first variant's
    /// smallest size (or its single image); otherwise the smallest
    /// top-level size.
    pub fn display_image(&self) -> Option<&str> {
        if let Some(image) = self.image() {
            return Some(image);
        }

        if let Some(first) = self.variants.first() {
            let from_sizes = first
                .smallest_size()
                .and_then(|label| first.size_entry(label))
                .and_then(SizeEntry::image);
            if let Some(image) = from_sizes.or(first.single_image.as_deref()) {
                return Some(image);
            }
        }

        smallest_size(self.sizes.iter().map(|s| s.size.as_str()))
            .and_then(|label| self.size_entry(label))
            .and_then(SizeEntry::image)
    }

    /// Number of orderable variant/size combinations.
    pub fn variation_count(&self) -> usize {
        if self.variants.is_empty() {
            self.sizes.len()
        } else {
            self.variants.iter().map(|v| v.sizes.len()).sum()
        }
    }

    /// Fold REST-only fields into the canonical ones and derive a missing slug.
    pub fn normalize(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.name);
        }
        if self.image().is_none() {
            if let Some(url) = self.image_url.take() {
                self.image = Some(url);
            }
        }
    }
}

fn sorted_entries(entries: &[SizeEntry]) -> Vec<&SizeEntry> {
    let mut sorted: Vec<&SizeEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| compare_sizes(&a.size, &b.size));
    sorted
}

pub(crate) fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
