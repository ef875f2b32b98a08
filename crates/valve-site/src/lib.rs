//! Storefront glue around the valve catalog.
//!
//! Everything here consumes `valve-catalog` data and produces something a
//! web deployment serves: CORS decisions, contact notifications, blog SEO
//! metadata, the sitemap and HTML page sections.

pub mod blog;
pub mod config;
pub mod contact;
pub mod cors;
pub mod error;
pub mod html;
pub mod sections;
pub mod sitemap;

pub use blog::{parse_posts, published_posts, BlogPost};
pub use config::{ApiEndpoints, ConfigReport, ContactConfig, CorsConfig, SiteConfig};
pub use contact::{ContactMessage, OutgoingEmail};
pub use cors::OriginPolicy;
pub use error::{FieldError, SiteError, SiteResult};
pub use sections::{render_category, render_product_detail};
pub use sitemap::{ChangeFreq, SitemapBuilder, SitemapUrl};
