//! Product detail section.

use valve_catalog::catalog::{format_size, ProductShape, ProductType};
use valve_catalog::selection::SelectionView;

use crate::html::escape_html;

/// Render the product detail page body for the current selection.
pub fn render_product_detail(product: &ProductType, view: &SelectionView) -> String {
    format!(
        r#"<section class="product-detail" data-section="product" data-product-id="{id}" data-shape="{shape}">
    {image}
    <div class="product-info">
        <h1 class="product-name">{name}</h1>
        {description}
        {variants}
        {sizes}
    </div>
    {specs}
    {applications}
    {standards}
</section>"#,
        id = escape_html(product.id.as_str()),
        shape = view.shape.as_str(),
        image = render_image(&product.name, view),
        name = escape_html(&product.name),
        description = render_description(&product.description),
        variants = render_variants(view),
        sizes = render_sizes(view),
        specs = render_specifications(product),
        applications = render_list("product-applications", "Aplicações", &product.applications),
        standards = render_list("product-standards", "Normas", &product.standards),
    )
}

fn render_description(description: &str) -> String {
    if description.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<p class="product-description">{}</p>"#,
        escape_html(description.trim())
    )
}

fn render_image(alt: &str, view: &SelectionView) -> String {
    match &view.current_image {
        Some(src) => format!(
            r#"<div class="product-image"><img src="{}" alt="{}"></div>"#,
            escape_html(src),
            escape_html(alt)
        ),
        None => {
            let hint = if view.shape == ProductShape::Complex && view.selected_variant.is_none() {
                "Selecione um material para ver a imagem"
            } else {
                "Imagem indisponível"
            };
            format!(
                r#"<div class="product-image product-image--placeholder"><span>{}</span></div>"#,
                hint
            )
        }
    }
}

fn render_variants(view: &SelectionView) -> String {
    if view.available_variants.is_empty() {
        return String::new();
    }
    let options: String = view
        .available_variants
        .iter()
        .map(|v| {
            let selected = view.selected_variant.as_deref() == Some(v.as_str());
            format!(
                r#"
            <li><button class="variant-option{}" data-variant="{}" aria-pressed="{}">{}</button></li>"#,
                if selected { " selected" } else { "" },
                escape_html(v),
                selected,
                escape_html(v)
            )
        })
        .collect();
    format!(
        r#"<div class="product-variants">
            <h2>Material</h2>
            <ul>{}
            </ul>
        </div>"#,
        options
    )
}

fn render_sizes(view: &SelectionView) -> String {
    if view.available_sizes.is_empty() {
        return String::new();
    }
    let options: String = view
        .available_sizes
        .iter()
        .map(|s| {
            let selected = view.selected_size.as_deref() == Some(s.as_str());
            format!(
                r#"
            <li><button class="size-option{}" data-size="{}" aria-pressed="{}">{}</button></li>"#,
                if selected { " selected" } else { "" },
                escape_html(s),
                selected,
                escape_html(&format_size(s))
            )
        })
        .collect();
    format!(
        r#"<div class="product-sizes">
            <h2>Bitola</h2>
            <ul>{}
            </ul>
        </div>"#,
        options
    )
}

fn render_specifications(product: &ProductType) -> String {
    if product.specifications.is_empty() {
        return String::new();
    }
    let rows: String = product
        .specifications
        .iter()
        .map(|(key, value)| {
            format!(
                r#"
        <tr><th>{}</th><td>{}</td></tr>"#,
                escape_html(key),
                escape_html(value)
            )
        })
        .collect();
    format!(
        r#"<table class="product-specifications">{}
    </table>"#,
        rows
    )
}

fn render_list(class: &str, title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items
        .iter()
        .map(|i| format!("<li>{}</li>", escape_html(i)))
        .collect();
    format!(
        r#"<div class="{}"><h2>{}</h2><ul>{}</ul></div>"#,
        class, title, items
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use valve_catalog::repository::StaticCatalog;
    use valve_catalog::selection::ProductSelector;

    fn esfera() -> ProductType {
        StaticCatalog::seed()
            .find_product_by_slug("valvula-esfera")
            .map(|(_, p)| p.clone())
            .unwrap()
    }

    #[test]
    fn test_placeholder_before_variant() {
        let product = esfera();
        let view = ProductSelector::new(&product).view();
        let html = render_product_detail(&product, &view);

        assert!(html.contains("product-image--placeholder"));
        assert!(html.contains("Selecione um material"));
        assert!(!html.contains("variant-option selected"));
        assert!(!html.contains("size-option"));
        assert!(html.contains("<th>Pressão Máxima</th><td>150 PSI</td>"));
    }

    #[test]
    fn test_selected_variant_and_size() {
        let product = esfera();
        let mut selector = ProductSelector::new(&product);
        selector.select_variant("Latão");
        let html = render_product_detail(&product, &selector.view());

        assert!(html.contains(r#"class="variant-option selected" data-variant="Latão""#));
        assert!(html.contains(r#"class="size-option selected" data-size="1/2&quot;""#));
        assert!(html.contains(r#"<img src=""#));

        let half = html.find(r#"data-size="1/2&quot;""#).unwrap();
        let three_quarter = html.find(r#"data-size="3/4&quot;""#).unwrap();
        assert!(half < three_quarter);
    }

    #[test]
    fn test_escapes_text() {
        let product = ProductType::new("9", "A <b>", "a").with_image("/a.jpg");
        let view = ProductSelector::new(&product).view();
        let html = render_product_detail(&product, &view);
        assert!(html.contains("A &lt;b&gt;"));
        assert!(html.contains(r#"data-shape="simple""#));
        assert!(!html.contains("product-variants"));
    }
}
