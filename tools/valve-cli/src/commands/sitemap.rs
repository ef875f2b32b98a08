//! Sitemap generation command.

use anyhow::{Context as _, Result};
use chrono::{NaiveDate, Utc};
use dialoguer::Confirm;
use valve_site::blog::{parse_posts, published_posts};
use valve_site::SitemapBuilder;

use super::SitemapArgs;
use crate::context::Context;

/// Run the sitemap command.
pub async fn run(args: SitemapArgs, ctx: &Context) -> Result<()> {
    let logger = ctx.logger("sitemap");

    let today = match &args.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid --date '{}', expected YYYY-MM-DD", date))?,
        None => Utc::now().date_naive(),
    };

    let catalog = ctx.load_catalog().await?;

    let posts = match &args.posts {
        Some(file) => {
            let path = ctx.resolve_path(file);
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read posts file: {}", path.display()))?;
            parse_posts(&content)
                .with_context(|| format!("Failed to parse posts file: {}", path.display()))?
        }
        None => Vec::new(),
    };
    let published = published_posts(&posts, Utc::now());
    if published.len() < posts.len() {
        ctx.output.debug(&format!(
            "Skipping {} unpublished post(s)",
            posts.len() - published.len()
        ));
    }

    let sitemap = SitemapBuilder::new(ctx.config.site.url.as_str(), today)
        .with_catalog(catalog.categories())
        .with_posts(published);
    let xml = sitemap.render();

    logger
        .info_builder("sitemap generated")
        .field_usize("urls", sitemap.len())
        .field("lastmod", today.to_string())
        .field_i64("lastmod_offset_days", (today - Utc::now().date_naive()).num_days())
        .emit();

    let Some(output) = &args.output else {
        if ctx.output.is_json() {
            ctx.output.json(&sitemap.urls());
        } else {
            print!("{}", xml);
        }
        return Ok(());
    };

    let path = ctx.resolve_path(output);
    if path.exists() && !args.yes {
        if ctx.output.is_json() {
            anyhow::bail!(
                "{} already exists. Use --yes to overwrite.",
                path.display()
            );
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", path.display()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Sitemap not written");
            return Ok(());
        }
    }

    tokio::fs::write(&path, xml)
        .await
        .with_context(|| format!("Failed to write sitemap: {}", path.display()))?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "path": path.display().to_string(),
            "urls": sitemap.len(),
        }));
    } else {
        ctx.output.success(&format!(
            "Sitemap generated with {} URLs: {}",
            sitemap.len(),
            path.display()
        ));
    }

    Ok(())
}
