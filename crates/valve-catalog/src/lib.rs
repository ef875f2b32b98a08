//! Industrial valve catalog: data model, size ordering and variant selection.
//!
//! - **Catalog**: categories, products, variants and size entries
//! - **Sizes**: parsing and ordering of engineering size labels
//! - **Selection**: which variant and size a visitor has picked, and the
//!   image that follows from it
//! - **Repository**: loading catalogs from bundled data or JSON listings
//!
//! # Example
//!
//! ```rust
//! use valve_catalog::prelude::*;
//!
//! let catalog = StaticCatalog::seed();
//! let product = catalog.load_product_by_slug("valvula-esfera").unwrap();
//!
//! let mut selector = ProductSelector::new(&product);
//! assert!(selector.has_variants());
//! assert_eq!(selector.current_image(), None);
//!
//! selector.select_variant("Inox");
//! assert_eq!(selector.selected_size(), Some("1/2\""));
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod repository;
pub mod seed;
pub mod selection;
pub mod slug;
pub mod validate;

pub use error::{CatalogError, CatalogResult};
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, CatalogResult};
    pub use crate::ids::*;

    pub use crate::catalog::{
        format_size, parse_size, sort_sizes, Category, ProductKind, ProductShape, ProductType,
        SizeEntry, Specifications, Variant,
    };

    pub use crate::repository::{CatalogRepository, StaticCatalog};
    pub use crate::selection::{
        available_sizes, current_image, ProductSelector, SelectionState, SelectionView,
    };
    pub use crate::validate::{validate_catalog, Severity, ValidationReport};
}
