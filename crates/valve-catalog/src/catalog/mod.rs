//! Catalog data model.
//!
//! Categories contain products; a product has variants with sizes, sizes
//! of its own, or neither.

mod category;
mod fields;
mod product;
pub mod size;

pub use category::Category;
pub use fields::Specifications;
pub use product::{ProductKind, ProductShape, ProductType, SizeEntry, Variant};
pub use size::{compare_sizes, format_size, parse_size, smallest_size, sort_by_size, sort_sizes};

pub(crate) use product::non_blank;
