//! Catalog error types.

use thiserror::Error;

/// Errors raised while loading or querying catalog data.
///
/// Size parsing and variant selection never fail; only repository lookups
/// and data decoding produce these.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Variant not found on a product.
    #[error("Variant not found: {variant} (product {product})")]
    VariantNotFound { product: String, variant: String },

    /// Catalog data could not be decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Catalog data decoded but is structurally invalid.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
