//! Product detail command.

use anyhow::Result;
use dialoguer::Select;
use serde_json::json;
use valve_catalog::catalog::{format_size, ProductType};
use valve_catalog::selection::ProductSelector;
use valve_catalog::CatalogError;
use valve_site::render_product_detail;

use super::ProductArgs;
use crate::context::Context;
use crate::output::shape_badge;

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog().await?;
    let (category, product) = catalog
        .find_product_by_slug(&args.slug)
        .ok_or_else(|| CatalogError::ProductNotFound(args.slug.clone()))?;

    let mut selector = ProductSelector::new(product);

    if let Some(variant) = &args.variant {
        if product.variant(variant).is_none() {
            return Err(CatalogError::VariantNotFound {
                product: product.slug.clone(),
                variant: variant.clone(),
            }
            .into());
        }
        selector.select_variant(variant.as_str());
    }

    if let Some(size) = &args.size {
        selector.select_size(size.as_str());
        if selector.selected_size_entry().is_none() {
            ctx.output
                .warn(&format!("Size {} is not offered for this selection", size));
        }
    }

    if args.interactive {
        pick(&mut selector)?;
    }

    let view = selector.view();

    ctx.logger("product")
        .debug_builder("selection resolved")
        .field("product", product.slug.as_str())
        .field_opt("variant", view.selected_variant.as_deref())
        .field_opt("size", view.selected_size.as_deref())
        .field_bool("has_image", view.current_image.is_some())
        .emit();

    if args.html {
        println!("{}", render_product_detail(product, &view));
        return Ok(());
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "category": category.slug,
            "product": product,
            "selection": view,
        }));
        return Ok(());
    }

    print_summary(product, &selector, ctx);
    Ok(())
}

/// Prompt for a variant (when the product has any) and then a size.
fn pick(selector: &mut ProductSelector<'_>) -> Result<()> {
    if selector.has_variants() {
        let names: Vec<&str> = selector
            .available_variants()
            .iter()
            .map(|v| v.kind.as_str())
            .collect();
        let current = selector
            .selected_variant_name()
            .and_then(|name| names.iter().position(|n| *n == name))
            .unwrap_or(0);
        let index = Select::new()
            .with_prompt("Material")
            .items(&names)
            .default(current)
            .interact()?;
        let chosen = names[index].to_string();
        selector.select_variant(chosen);
    }

    let sizes: Vec<String> = selector
        .available_sizes()
        .iter()
        .map(|s| s.size.clone())
        .collect();
    if sizes.is_empty() {
        return Ok(());
    }

    let labels: Vec<String> = sizes.iter().map(|s| format_size(s)).collect();
    let current = selector
        .selected_size()
        .and_then(|size| sizes.iter().position(|s| s == size))
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt("Bitola")
        .items(&labels)
        .default(current)
        .interact()?;
    selector.select_size(sizes[index].clone());

    Ok(())
}

fn print_summary(product: &ProductType, selector: &ProductSelector<'_>, ctx: &Context) {
    ctx.output.header(&product.name);
    ctx.output.kv("slug", &product.slug);
    ctx.output.kv("shape", &shape_badge(product.shape()));
    if !product.description.is_empty() {
        ctx.output.kv("description", &product.description);
    }

    if selector.has_variants() {
        ctx.output.info("Variants:");
        for variant in selector.available_variants() {
            let marker = if selector.selected_variant_name() == Some(variant.kind.as_str()) {
                " (selected)"
            } else {
                ""
            };
            ctx.output.list_item(&format!("{}{}", variant.kind, marker));
        }
    }

    let sizes = selector.available_sizes();
    if !sizes.is_empty() {
        ctx.output.info("Sizes:");
        for entry in sizes {
            let marker = if selector.selected_size() == Some(entry.size.as_str()) {
                " (selected)"
            } else {
                ""
            };
            ctx.output
                .list_item(&format!("{}{}", format_size(&entry.size), marker));
        }
    }

    for (key, value) in product.specifications.iter() {
        ctx.output.kv(key, value);
    }

    match selector.current_image() {
        Some(image) => ctx.output.kv("image", image),
        None if selector.has_variants() && selector.selected_variant_name().is_none() => {
            ctx.output.info("Select a variant to see its image")
        }
        None => ctx.output.kv("image", "none"),
    }
}
