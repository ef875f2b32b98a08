//! Catalog listing command.

use anyhow::Result;
use valve_catalog::catalog::Category;
use valve_catalog::CatalogError;

use super::CatalogArgs;
use crate::context::Context;
use crate::output::shape_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog().await?;

    let categories: Vec<&Category> = match &args.category {
        Some(slug) => {
            let category = catalog
                .categories()
                .iter()
                .find(|c| c.slug == *slug)
                .ok_or_else(|| CatalogError::CategoryNotFound(slug.clone()))?;
            vec![category]
        }
        None => catalog.categories().iter().filter(|c| c.is_active).collect(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    for category in categories {
        ctx.output.header(&format!("{} ({})", category.name, category.slug));
        let widths = [28, 24, 14, 10];
        ctx.output
            .table_row(&["PRODUCT", "SLUG", "SHAPE", "VARIATIONS"], &widths);

        let mut listed = 0;
        for product in &category.products {
            if !product.is_active && !args.all {
                continue;
            }
            let count = product.variation_count().to_string();
            let shape = shape_badge(product.shape());
            ctx.output.table_row(
                &[
                    product.name.as_str(),
                    product.slug.as_str(),
                    shape.as_str(),
                    count.as_str(),
                ],
                &widths,
            );
            listed += 1;
        }

        if listed == 0 {
            ctx.output.info("No products");
        }
    }

    Ok(())
}
