//! Variant and size selection for one displayed product.
//!
//! [`SelectionState`] holds only the two user choices and the id of the
//! product they belong to. Everything shown on a product page (which sizes
//! to offer, which image to display) is derived from the state and the
//! product on every read by the free functions in this module, so there is
//! nothing to invalidate when the catalog data is refreshed.
//!
//! Transitions never fail. A selection that does not exist on the product
//! simply stops resolving to an image.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    non_blank, smallest_size, ProductKind, ProductShape, ProductType, SizeEntry, Variant,
};
use crate::ids::ProductId;

/// The user's current choices for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Product these choices belong to.
    pub product_id: Option<ProductId>,
    /// Selected variant label.
    pub selected_variant: Option<String>,
    /// Selected size label, verbatim.
    pub selected_size: Option<String>,
}

impl SelectionState {
    /// Initial choices for a freshly displayed product.
    ///
    /// Complex products start with nothing selected: variants have no
    /// natural order, so the visitor must pick one first. Intermediate
    /// products preselect their smallest size. Simple products have
    /// nothing to select.
    pub fn initial(product: &ProductType) -> Self {
        let selected_size = match product.kind() {
            ProductKind::Intermediate { sizes } => {
                smallest_size(sizes.iter().map(|s| s.size.as_str())).map(str::to_string)
            }
            ProductKind::Complex { .. } | ProductKind::Simple { .. } => None,
        };

        Self {
            product_id: Some(product.id.clone()),
            selected_variant: None,
            selected_size,
        }
    }

    /// Re-initialize if `product` is not the one these choices belong to.
    ///
    /// Returns `true` when the state was reset.
    pub fn rebind(&mut self, product: &ProductType) -> bool {
        if self.product_id.as_ref() == Some(&product.id) {
            return false;
        }
        *self = Self::initial(product);
        true
    }

    /// Select a variant and preselect its smallest size.
    ///
    /// The size from any previously selected variant is always discarded.
    pub fn select_variant(&mut self, product: &ProductType, variant: impl Into<String>) {
        let variant = variant.into();
        self.selected_size = product
            .variant(&variant)
            .and_then(Variant::smallest_size)
            .map(str::to_string);
        self.selected_variant = Some(variant);
    }

    /// Select a size label as given. The variant is left untouched.
    pub fn select_size(&mut self, size: impl Into<String>) {
        self.selected_size = Some(size.into());
    }
}

/// Variants offered for selection, in catalog order.
pub fn available_variants(product: &ProductType) -> &[Variant] {
    &product.variants
}

/// The selected variant, if it exists on the product.
pub fn selected_variant<'a>(state: &SelectionState, product: &'a ProductType) -> Option<&'a Variant> {
    state
        .selected_variant
        .as_deref()
        .and_then(|kind| product.variant(kind))
}

/// Sizes offered for selection in ascending order.
///
/// The selected variant's sizes when it resolves and has any; otherwise the
/// product's own sizes.
pub fn available_sizes<'a>(state: &SelectionState, product: &'a ProductType) -> Vec<&'a SizeEntry> {
    match selected_variant(state, product) {
        Some(variant) if !variant.sizes.is_empty() => variant.sorted_sizes(),
        _ => product.sorted_sizes(),
    }
}

/// The size entry matching the current selection, if any.
///
/// Looked up in the selected variant, or among the product's own sizes
/// when no variant resolves and the product is not complex.
pub fn selected_size_entry<'a>(
    state: &SelectionState,
    product: &'a ProductType,
) -> Option<&'a SizeEntry> {
    let size = state.selected_size.as_deref()?;
    match selected_variant(state, product) {
        Some(variant) => variant.size_entry(size),
        None if product.shape() != ProductShape::Complex => product.size_entry(size),
        None => None,
    }
}

/// Image to display for the current selection.
///
/// Resolution order:
/// 1. the selected variant's entry for the selected size;
/// 2. the selected variant's single image when it has no sizes;
/// 3. for products without variants, the selected top-level size;
/// 4. the product's own image.
///
/// A matching size entry with a blank image resolves to `None` instead of
/// falling back, so the page shows a placeholder rather than a picture of
/// the wrong size.
pub fn current_image<'a>(state: &SelectionState, product: &'a ProductType) -> Option<&'a str> {
    let size = state.selected_size.as_deref();

    if let Some(variant) = selected_variant(state, product) {
        if let Some(entry) = size.and_then(|s| variant.size_entry(s)) {
            return entry.image();
        }
        if variant.sizes.is_empty() {
            if let Some(image) = variant.single_image.as_deref().and_then(non_blank) {
                return Some(image);
            }
        }
    }

    if product.shape() != ProductShape::Complex {
        if let Some(entry) = size.and_then(|s| product.size_entry(s)) {
            return entry.image();
        }
    }

    product.image()
}

/// Selection bound to a borrowed product.
///
/// Wraps [`SelectionState`] with the product it applies to, so callers can
/// ask for derived values without threading the product through every call.
#[derive(Debug, Clone)]
pub struct ProductSelector<'a> {
    product: &'a ProductType,
    state: SelectionState,
}

impl<'a> ProductSelector<'a> {
    pub fn new(product: &'a ProductType) -> Self {
        Self {
            product,
            state: SelectionState::initial(product),
        }
    }

    /// Resume from saved choices, re-initializing if they belong elsewhere.
    pub fn with_state(product: &'a ProductType, mut state: SelectionState) -> Self {
        state.rebind(product);
        Self { product, state }
    }

    /// Point the selector at another product.
    ///
    /// Choices survive only when the new product has the same id (e.g. a
    /// refreshed copy of the same catalog entry).
    pub fn bind(&mut self, product: &'a ProductType) -> bool {
        self.product = product;
        self.state.rebind(product)
    }

    pub fn select_variant(&mut self, variant: impl Into<String>) {
        self.state.select_variant(self.product, variant);
    }

    pub fn select_size(&mut self, size: impl Into<String>) {
        self.state.select_size(size);
    }

    pub fn product(&self) -> &'a ProductType {
        self.product
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn shape(&self) -> ProductShape {
        self.product.shape()
    }

    pub fn selected_variant_name(&self) -> Option<&str> {
        self.state.selected_variant.as_deref()
    }

    pub fn selected_size(&self) -> Option<&str> {
        self.state.selected_size.as_deref()
    }

    pub fn available_variants(&self) -> &'a [Variant] {
        available_variants(self.product)
    }

    pub fn available_sizes(&self) -> Vec<&'a SizeEntry> {
        available_sizes(&self.state, self.product)
    }

    pub fn selected_variant(&self) -> Option<&'a Variant> {
        selected_variant(&self.state, self.product)
    }

    pub fn selected_size_entry(&self) -> Option<&'a SizeEntry> {
        selected_size_entry(&self.state, self.product)
    }

    pub fn current_image(&self) -> Option<&'a str> {
        current_image(&self.state, self.product)
    }

    pub fn has_variants(&self) -> bool {
        self.shape() == ProductShape::Complex
    }

    pub fn has_sizes(&self) -> bool {
        self.shape() != ProductShape::Simple
    }

    pub fn is_simple(&self) -> bool {
        self.shape() == ProductShape::Simple
    }

    /// Snapshot of everything a renderer needs.
    pub fn view(&self) -> SelectionView {
        SelectionView {
            product_id: self.product.id.clone(),
            shape: self.shape(),
            selected_variant: self.state.selected_variant.clone(),
            selected_size: self.state.selected_size.clone(),
            available_variants: self
                .available_variants()
                .iter()
                .map(|v| v.kind.clone())
                .collect(),
            available_sizes: self
                .available_sizes()
                .iter()
                .map(|s| s.size.clone())
                .collect(),
            current_image: self.current_image().map(str::to_string),
            has_variants: self.has_variants(),
            has_sizes: self.has_sizes(),
            is_simple: self.is_simple(),
        }
    }
}

/// Owned, serializable snapshot of a selection and its derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionView {
    pub product_id: ProductId,
    pub shape: ProductShape,
    pub selected_variant: Option<String>,
    pub selected_size: Option<String>,
    pub available_variants: Vec<String>,
    pub available_sizes: Vec<String>,
    pub current_image: Option<String>,
    pub has_variants: bool,
    pub has_sizes: bool,
    pub is_simple: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_valve() -> ProductType {
        ProductType::new("1", "Válvula de Esfera", "valvula-esfera")
            .with_variant(
                Variant::new("Aço Carbono")
                    .with_size("2\"", "/aco-2.jpg")
                    .with_size("1\"", "/aco-1.jpg"),
            )
            .with_variant(
                Variant::new("Inox")
                    .with_size("1", "/inox-1.jpg")
                    .with_size("1/2", "/inox-1-2.jpg")
                    .with_size("2", "/inox-2.jpg"),
            )
            .with_variant(Variant::new("Monobloco").with_single_image("/mono.jpg"))
    }

    fn check_valve() -> ProductType {
        ProductType::new("3", "Válvula de Retenção", "valvula-retencao")
            .with_image("/retencao.jpg")
            .with_size("2", "/ret-2.jpg")
            .with_size("1/2", "/ret-1-2.jpg")
            .with_size("1", "/ret-1.jpg")
    }

    fn flange() -> ProductType {
        ProductType::new("4", "Flanges", "flanges").with_image("/flanges.png")
    }

    #[test]
    fn test_complex_starts_unselected() {
        let product = ball_valve();
        let state = SelectionState::initial(&product);
        assert_eq!(state.selected_variant, None);
        assert_eq!(state.selected_size, None);
        assert_eq!(current_image(&state, &product), None);
        assert!(available_sizes(&state, &product).is_empty());
    }

    #[test]
    fn test_intermediate_preselects_smallest_size() {
        let product = check_valve();
        let state = SelectionState::initial(&product);
        assert_eq!(state.selected_variant, None);
        assert_eq!(state.selected_size.as_deref(), Some("1/2"));
        assert_eq!(current_image(&state, &product), Some("/ret-1-2.jpg"));
    }

    #[test]
    fn test_simple_has_nothing_selected() {
        let product = flange();
        let selector = ProductSelector::new(&product);
        assert!(selector.is_simple());
        assert!(!selector.has_sizes());
        assert_eq!(selector.selected_size(), None);
        assert_eq!(selector.current_image(), Some("/flanges.png"));
    }

    #[test]
    fn test_select_variant_picks_smallest_size() {
        let product = ball_valve();
        let mut state = SelectionState::initial(&product);
        state.select_variant(&product, "Inox");
        assert_eq!(state.selected_variant.as_deref(), Some("Inox"));
        assert_eq!(state.selected_size.as_deref(), Some("1/2"));
        assert_eq!(current_image(&state, &product), Some("/inox-1-2.jpg"));
    }

    #[test]
    fn test_switching_variant_recomputes_size() {
        let product = ball_valve();
        let mut state = SelectionState::initial(&product);
        state.select_variant(&product, "Inox");
        state.select_size("2");
        state.select_variant(&product, "Aço Carbono");
        assert_eq!(state.selected_size.as_deref(), Some("1\""));

        state.select_variant(&product, "Monobloco");
        assert_eq!(state.selected_size, None);
        assert_eq!(current_image(&state, &product), Some("/mono.jpg"));
    }

    #[test]
    fn test_select_size_is_verbatim() {
        let product = ball_valve();
        let mut selector = ProductSelector::new(&product);
        selector.select_variant("Inox");
        selector.select_size("9\"");
        assert_eq!(selector.selected_size(), Some("9\""));
        assert_eq!(selector.selected_variant_name(), Some("Inox"));
        assert_eq!(selector.current_image(), None);
    }

    #[test]
    fn test_unknown_variant_degrades() {
        let product = ball_valve();
        let mut selector = ProductSelector::new(&product);
        selector.select_variant("Titânio");
        assert_eq!(selector.selected_size(), None);
        assert!(selector.available_sizes().is_empty());
        assert!(selector.selected_variant().is_none());
        assert_eq!(selector.current_image(), None);
    }

    #[test]
    fn test_unknown_variant_on_intermediate_keeps_own_sizes() {
        let product = ProductType::new("5", "Registro", "registro")
            .with_size("2", "/2.jpg")
            .with_size("1/2", "/12.jpg");
        let mut state = SelectionState::initial(&product);
        state.select_variant(&product, "Inox");
        state.select_size("1/2");

        let labels: Vec<&str> = available_sizes(&state, &product)
            .iter()
            .map(|s| s.size.as_str())
            .collect();
        assert_eq!(labels, vec!["1/2", "2"]);
        assert_eq!(
            selected_size_entry(&state, &product).map(|e| e.size.as_str()),
            Some("1/2")
        );
        assert_eq!(current_image(&state, &product), Some("/12.jpg"));
    }

    #[test]
    fn test_selected_size_entry() {
        let product = ball_valve();
        let mut selector = ProductSelector::new(&product);
        assert!(selector.selected_size_entry().is_none());

        selector.select_variant("Aço Carbono");
        let entry = selector.selected_size_entry().unwrap();
        assert_eq!(entry.size, "1\"");
        assert_eq!(entry.image(), Some("/aco-1.jpg"));

        selector.select_size("1/2");
        assert!(selector.selected_size_entry().is_none());
    }

    #[test]
    fn test_complex_with_cover_image_shows_it_until_selected() {
        let product = ball_valve().with_image("/cover.jpg");
        let mut selector = ProductSelector::new(&product);
        assert_eq!(selector.selected_variant_name(), None);
        assert_eq!(selector.current_image(), Some("/cover.jpg"));

        selector.select_variant("Inox");
        assert_eq!(selector.current_image(), Some("/inox-1-2.jpg"));
    }

    #[test]
    fn test_unknown_size_falls_back_to_product_image() {
        let product = check_valve();
        let mut state = SelectionState::initial(&product);
        state.select_size("DN400");
        assert_eq!(current_image(&state, &product), Some("/retencao.jpg"));
    }

    #[test]
    fn test_blank_size_image_resolves_to_none() {
        let product = ProductType::new("9", "X", "x")
            .with_image("/cover.png")
            .with_size("1", "");
        let state = SelectionState::initial(&product);
        assert_eq!(state.selected_size.as_deref(), Some("1"));
        assert_eq!(current_image(&state, &product), None);
    }

    #[test]
    fn test_available_sizes_sorted() {
        let product = ball_valve();
        let mut state = SelectionState::initial(&product);
        state.select_variant(&product, "Inox");
        let labels: Vec<&str> = available_sizes(&state, &product)
            .iter()
            .map(|s| s.size.as_str())
            .collect();
        assert_eq!(labels, vec!["1/2", "1", "2"]);

        let product = check_valve();
        let state = SelectionState::initial(&product);
        let labels: Vec<&str> = available_sizes(&state, &product)
            .iter()
            .map(|s| s.size.as_str())
            .collect();
        assert_eq!(labels, vec!["1/2", "1", "2"]);
    }

    #[test]
    fn test_rebind_resets_on_new_product() {
        let first = ball_valve();
        let second = check_valve();
        let refreshed = second.clone();
        let mut selector = ProductSelector::new(&first);
        selector.select_variant("Inox");

        assert!(selector.bind(&second));
        assert_eq!(selector.selected_variant_name(), None);
        assert_eq!(selector.selected_size(), Some("1/2"));

        selector.select_size("2");
        assert!(!selector.bind(&refreshed));
        assert_eq!(selector.selected_size(), Some("2"));
    }

    #[test]
    fn test_with_state_discards_foreign_choices() {
        let product = check_valve();
        let foreign = SelectionState {
            product_id: Some(ProductId::new("1")),
            selected_variant: Some("Inox".to_string()),
            selected_size: Some("2".to_string()),
        };
        let selector = ProductSelector::with_state(&product, foreign);
        assert_eq!(selector.state(), &SelectionState::initial(&product));
    }

    #[test]
    fn test_flags_and_view() {
        let product = ball_valve();
        let mut selector = ProductSelector::new(&product);
        assert!(selector.has_variants());
        assert!(selector.has_sizes());
        assert!(!selector.is_simple());

        selector.select_variant("Aço Carbono");
        let view = selector.view();
        assert_eq!(view.shape, ProductShape::Complex);
        assert_eq!(view.available_variants, vec!["Aço Carbono", "Inox", "Monobloco"]);
        assert_eq!(view.available_sizes, vec!["1\"", "2\""]);
        assert_eq!(view.current_image.as_deref(), Some("/aco-1.jpg"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["shape"], "complex");
    }
}
