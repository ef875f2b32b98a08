//! Valve CLI - browse and publish the industrial valve catalog.
//!
//! Commands:
//! - `valve catalog` - List categories and products
//! - `valve product` - Show a product and pick a variant and size
//! - `valve sizes` - Order size labels
//! - `valve validate` - Check catalog data
//! - `valve sitemap` - Generate sitemap.xml
//! - `valve contact` - Compose the notification for a contact form
//! - `valve config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, ConfigArgs, ContactArgs, ProductArgs, SitemapArgs, SizesArgs};

/// Valve CLI - Browse, validate and publish the valve catalog
#[derive(Parser)]
#[command(name = "valve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog JSON file (overrides catalog.data_path)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories and their products
    Catalog(CatalogArgs),

    /// Show a product and its variant/size selection
    Product(ProductArgs),

    /// Sort size labels smallest first
    Sizes(SizesArgs),

    /// Check catalog data for structural problems
    Validate,

    /// Generate the sitemap
    Sitemap(SitemapArgs),

    /// Validate a contact form and compose its notification e-mail
    Contact(ContactArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), cli.data, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Sizes(args) => commands::sizes::run(args, &ctx).await,
        Commands::Validate => commands::validate::run(&ctx).await,
        Commands::Sitemap(args) => commands::sitemap::run(args, &ctx).await,
        Commands::Contact(args) => commands::contact::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
