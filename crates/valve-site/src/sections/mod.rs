//! HTML section renderers for catalog pages.

mod category;
mod product;

pub use category::*;
pub use product::*;
