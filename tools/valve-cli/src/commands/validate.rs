//! Catalog validation command.

use anyhow::Result;
use valve_catalog::validate::validate_catalog;
use valve_catalog::CatalogError;

use crate::context::Context;
use crate::output::severity_badge;

/// Run the validate command.
pub async fn run(ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog().await?;
    let report = validate_catalog(catalog.categories());

    ctx.logger("validate")
        .info_builder("catalog validated")
        .field_usize("products", catalog.product_count())
        .field_usize("errors", report.error_count())
        .field_usize("warnings", report.warnings().count())
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(&report);
    } else {
        ctx.output.header("Validating catalog");
        for issue in &report.issues {
            println!(
                "  {} {}: {}",
                severity_badge(issue.severity),
                issue.path,
                issue.message
            );
        }
    }

    if !report.is_valid() {
        return Err(CatalogError::ValidationError(format!(
            "catalog has {} error(s)",
            report.error_count()
        ))
        .into());
    }

    if report.issues.is_empty() {
        ctx.output.success(&format!(
            "Catalog is valid ({} products)",
            catalog.product_count()
        ));
    } else {
        ctx.output.success("Catalog is valid (with warnings)");
    }

    Ok(())
}
