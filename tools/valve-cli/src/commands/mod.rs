//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod product;
pub mod sitemap;
pub mod sizes;
pub mod validate;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Only list this category (slug).
    #[arg(long)]
    pub category: Option<String>,

    /// Include inactive products.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product slug.
    pub slug: String,

    /// Variant (material) to select.
    #[arg(long)]
    pub variant: Option<String>,

    /// Size label to select, after the variant.
    #[arg(long)]
    pub size: Option<String>,

    /// Pick variant and size from prompts.
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the rendered product section instead of a summary.
    #[arg(long)]
    pub html: bool,
}

/// Arguments for the sizes command.
#[derive(Args)]
pub struct SizesArgs {
    /// Size labels, e.g. '1"' '1/2"' '1 1/4"'.
    #[arg(required = true)]
    pub labels: Vec<String>,
}

/// Arguments for the sitemap command.
#[derive(Args)]
pub struct SitemapArgs {
    /// Blog post listing (JSON array or paginated envelope).
    #[arg(long)]
    pub posts: Option<String>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Date for lastmod, YYYY-MM-DD (default: today).
    #[arg(long)]
    pub date: Option<String>,

    /// Overwrite the output file without asking.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the contact command.
#[derive(Args)]
pub struct ContactArgs {
    /// JSON file with the submitted form.
    pub file: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
