//! Category listing section.

use valve_catalog::catalog::{Category, ProductShape, ProductType};

use crate::html::escape_html;

/// Render a category page with one card per active product.
pub fn render_category(category: &Category) -> String {
    let cards: String = category
        .active_products()
        .map(|p| render_product_card(&category.slug, p))
        .collect();

    let cards = if cards.is_empty() {
        r#"<p class="category-empty">Nenhum produto cadastrado nesta categoria.</p>"#.to_string()
    } else {
        format!(r#"<div class="product-grid">{}</div>"#, cards)
    };

    format!(
        r#"<section class="category" data-section="category" data-category="{slug}">
    <header class="category-header">
        <h1>{name}</h1>
        <p>{description}</p>
    </header>
    {cards}
</section>"#,
        slug = escape_html(&category.slug),
        name = escape_html(&category.name),
        description = escape_html(&category.description),
        cards = cards,
    )
}

fn render_product_card(category_slug: &str, product: &ProductType) -> String {
    let image = match product.display_image() {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" loading="lazy">"#,
            escape_html(src),
            escape_html(&product.name)
        ),
        None => r#"<div class="card-image-placeholder"></div>"#.to_string(),
    };

    let count = product.variation_count();
    let badge = match product.shape() {
        ProductShape::Complex => format!("{} variações", count),
        ProductShape::Intermediate => format!("{} bitolas", count),
        ProductShape::Simple => "Modelo único".to_string(),
    };

    format!(
        r#"
        <a class="product-card" href="/produtos/{cat}/{slug}" data-shape="{shape}">
            {image}
            <h2>{name}</h2>
            <span class="product-card-badge">{badge}</span>
        </a>"#,
        cat = escape_html(category_slug),
        slug = escape_html(&product.slug),
        shape = product.shape().as_str(),
        image = image,
        name = escape_html(&product.name),
        badge = badge,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use valve_catalog::seed::seed_categories;

    #[test]
    fn test_render_seed_category() {
        let categories = seed_categories();
        let html = render_category(&categories[0]);

        assert!(html.contains(r#"data-category="valvulas-industriais""#));
        assert!(html.contains(r#"href="/produtos/valvulas-industriais/valvula-esfera""#));
        assert!(html.contains("8 variações"));
        assert!(html.contains(r#"data-shape="intermediate""#));
    }

    #[test]
    fn test_empty_category() {
        let category = Category::new("9", "Vazia & Nova", "vazia");
        let html = render_category(&category);
        assert!(html.contains("Vazia &amp; Nova"));
        assert!(html.contains("category-empty"));
    }

    #[test]
    fn test_inactive_products_hidden() {
        let mut hidden = ProductType::new("1", "Oculto", "oculto");
        hidden.is_active = false;
        let category = Category::new("9", "C", "c").with_product(hidden);
        assert!(!render_category(&category).contains("Oculto"));
    }
}
