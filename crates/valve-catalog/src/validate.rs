//! Structural checks for catalog data.
//!
//! Imported or hand-edited catalogs can break the shape rules the selection
//! logic relies on. Validation never rejects data on its own; it reports
//! issues so a loader can decide.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::{parse_size, Category, ProductType, SizeEntry};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One problem found in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Slug path of the offending record, e.g. `valvulas/esfera/Inox`.
    pub path: String,
    pub message: String,
}

/// All issues found in one pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, path.into(), message.into());
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, path.into(), message.into());
    }

    fn push(&mut self, severity: Severity, path: String, message: String) {
        self.issues.push(Issue {
            severity,
            path,
            message,
        });
    }
}

/// Check every category and product.
pub fn validate_catalog(categories: &[Category]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut category_slugs = HashSet::new();
    let mut product_ids = HashSet::new();

    for category in categories {
        let path = category.slug.clone();
        if category.slug.trim().is_empty() {
            report.error(&category.name, "category slug is blank");
        } else if !category_slugs.insert(category.slug.as_str()) {
            report.error(&path, "duplicate category slug");
        }

        let mut product_slugs = HashSet::new();
        for product in &category.products {
            let product_path = format!("{}/{}", path, product.slug);
            if product.slug.trim().is_empty() {
                report.error(
                    format!("{}/{}", path, product.name),
                    "product slug is blank",
                );
            } else if !product_slugs.insert(product.slug.as_str()) {
                report.error(&product_path, "duplicate product slug in category");
            }
            if !product_ids.insert(product.id.as_str()) {
                report.error(&product_path, format!("duplicate product id {}", product.id));
            }
            validate_product(product, &product_path, &mut report);
        }
    }

    report
}

/// Check one product's shape.
pub fn validate_product(product: &ProductType, path: &str, report: &mut ValidationReport) {
    if !product.variants.is_empty() && !product.sizes.is_empty() {
        report.error(path, "product has both variants and top-level sizes");
    }

    if product.variants.is_empty() && product.sizes.is_empty() && product.image().is_none() {
        report.warn(path, "simple product has no image");
    }

    let mut kinds = HashSet::new();
    for variant in &product.variants {
        let variant_path = format!("{}/{}", path, variant.kind);
        if !kinds.insert(variant.kind.as_str()) {
            report.warn(&variant_path, "duplicate variant type");
        }
        if variant.sizes.is_empty() && variant.single_image.is_none() {
            report.error(&variant_path, "variant has neither sizes nor an image");
        }
        validate_sizes(&variant.sizes, &variant_path, report);
    }

    validate_sizes(&product.sizes, path, report);
}

fn validate_sizes(sizes: &[SizeEntry], path: &str, report: &mut ValidationReport) {
    let mut labels = HashSet::new();
    for entry in sizes {
        let entry_path = format!("{}/{}", path, entry.size);
        if !labels.insert(entry.size.as_str()) {
            report.error(&entry_path, "duplicate size label");
        }
        if entry.image().is_none() {
            report.error(&entry_path, "size has no image");
        }
        if parse_size(&entry.size).is_none() {
            report.warn(&entry_path, "size label has no number and will sort last");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Variant;
    use crate::seed::seed_categories;

    #[test]
    fn test_seed_is_clean() {
        let report = validate_catalog(&seed_categories());
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert!(report.is_valid());
    }

    #[test]
    fn test_shape_violations() {
        let product = ProductType::new("1", "Mixed", "mixed")
            .with_variant(Variant::new("Inox"))
            .with_size("1", "/1.png");
        let mut report = ValidationReport::default();
        validate_product(&product, "c/mixed", &mut report);

        let messages: Vec<&str> = report.errors().map(|i| i.message.as_str()).collect();
        assert!(messages.contains(&"product has both variants and top-level sizes"));
        assert!(messages.contains(&"variant has neither sizes nor an image"));
    }

    #[test]
    fn test_size_issues() {
        let product = ProductType::new("1", "S", "s")
            .with_size("1", "/1.png")
            .with_size("1", "")
            .with_size("grande", "/g.png");
        let mut report = ValidationReport::default();
        validate_product(&product, "c/s", &mut report);

        assert_eq!(report.error_count(), 2);
        let warning = report.warnings().next().unwrap();
        assert_eq!(warning.path, "c/s/grande");
    }

    #[test]
    fn test_duplicates_across_catalog() {
        let categories = vec![
            Category::new("1", "A", "a")
                .with_product(ProductType::new("p1", "X", "x").with_image("/x.png"))
                .with_product(ProductType::new("p1", "Y", "x").with_image("/y.png")),
            Category::new("2", "B", "a"),
        ];
        let report = validate_catalog(&categories);
        let messages: Vec<&str> = report.errors().map(|i| i.message.as_str()).collect();
        assert!(messages.contains(&"duplicate product slug in category"));
        assert!(messages.contains(&"duplicate product id p1"));
        assert!(messages.contains(&"duplicate category slug"));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_simple_without_image_is_warning() {
        let categories = vec![Category::new("1", "A", "a").with_product(ProductType::new(
            "1", "Bare", "bare",
        ))];
        let report = validate_catalog(&categories);
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }
}
