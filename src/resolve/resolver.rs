//! Display and purchase resolution over a catalog store.

use crate::catalog::{Product, Role};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::search::SearchFilters;
use crate::store::{like_match, CatalogStore};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A product resolved for display, with the facts the surrounding view
/// layer renders: selector options, effective price, stock, orderability,
/// and descriptions inherited from the parent for variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedProduct {
    /// The concrete item (root, standalone, or variant).
    pub product: Product,
    /// Colors selectable among the item's sibling variants, deduplicated,
    /// discovery order.
    pub available_colors: Vec<String>,
    /// Sizes selectable among the item's sibling variants.
    pub available_sizes: Vec<String>,
    /// Effective price (delegated to the default variant for roots).
    pub price: Money,
    /// Summed stock adjustments for this exact item.
    pub stock: i64,
    /// Whether the item counts as in stock.
    pub in_stock: bool,
    /// Whether the item can be ordered as-is.
    pub orderable: bool,
    /// Description, inherited from the parent for variants.
    pub description: Option<String>,
    /// Short description, inherited from the parent for variants.
    pub short_description: Option<String>,
    /// Display name qualified by the parent, e.g. `"Phone (Black-64GB)"`.
    pub full_name: String,
}

/// Outcome of purchase resolution.
///
/// A color/size selection that matches nothing is a visible variant, not
/// an error: the caller decides whether to re-prompt or fall back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PurchaseOutcome {
    /// One concrete product to hand to the order collaborator.
    Resolved(Product),
    /// The color/size selection matched no variant.
    NoMatch,
}

impl PurchaseOutcome {
    /// The resolved product, when there is one.
    pub fn resolved(self) -> Option<Product> {
        match self {
            PurchaseOutcome::Resolved(product) => Some(product),
            PurchaseOutcome::NoMatch => None,
        }
    }

    /// Check for the no-match outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, PurchaseOutcome::NoMatch)
    }
}

/// Resolves catalog requests against a [`CatalogStore`].
///
/// Stateless; every operation is a read-mostly query/transform completed
/// within the calling request.
pub struct Resolver<'a, S: CatalogStore> {
    store: &'a S,
}

impl<'a, S: CatalogStore> Resolver<'a, S> {
    /// Create a resolver over a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve a permalink (and optional color selection) for display.
    ///
    /// Roots with variants descend to the default-flagged variant, or to
    /// the first variant (logged) when the catalog is missing a default.
    /// A color selection re-resolves to the first matching sibling; a
    /// selection that matches nothing retains the current item rather
    /// than failing.
    pub fn resolve_for_display(
        &self,
        permalink: &str,
        color: Option<&str>,
    ) -> Result<ResolvedProduct, CommerceError> {
        let root = self
            .store
            .find_active_by_permalink(permalink)
            .ok_or_else(|| CommerceError::ProductNotFound(permalink.to_string()))?;

        let mut current = root;
        let children = self.store.children_of(&root.id);
        if !children.is_empty() {
            current = match children.iter().find(|c| c.default).copied() {
                Some(default) => default,
                None => {
                    warn!(
                        permalink = %root.permalink,
                        product = %root.id,
                        "root has variants but none flagged default; using first variant"
                    );
                    children[0]
                }
            };
        }

        if current.is_variant() {
            if let Some(color) = color {
                if let Some(first) =
                    sibling_color_matches(self.store, current, color).into_iter().next()
                {
                    current = first;
                }
            }
        }

        Ok(self.resolve_facts(current))
    }

    /// Resolve a permalink plus optional color/size for purchase.
    ///
    /// An unmatched permalink is a hard error; an unmatched color/size
    /// selection is the explicit [`PurchaseOutcome::NoMatch`] variant.
    /// The color+size lookup scans variants catalog-wide in insertion
    /// order and takes the first name containing `"<color>-<size>"`.
    pub fn resolve_for_purchase(
        &self,
        permalink: &str,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<PurchaseOutcome, CommerceError> {
        let product = self
            .store
            .find_active_by_permalink(permalink)
            .ok_or_else(|| CommerceError::ProductNotFound(permalink.to_string()))?;

        match (color, size) {
            (Some(color), Some(size)) => {
                let needle = format!("{}-{}", color, size);
                Ok(self
                    .store
                    .variants()
                    .into_iter()
                    .find(|v| like_match(&v.name, &needle))
                    .map(|v| PurchaseOutcome::Resolved(v.clone()))
                    .unwrap_or(PurchaseOutcome::NoMatch))
            }
            (Some(color), None) => Ok(sibling_color_matches(self.store, product, color)
                .into_iter()
                .next()
                .map(|v| PurchaseOutcome::Resolved(v.clone()))
                .unwrap_or(PurchaseOutcome::NoMatch)),
            _ => Ok(PurchaseOutcome::Resolved(product.clone())),
        }
    }

    /// Siblings of the product (under its parent, or its own children
    /// when it is a root) whose name contains the color substring.
    /// Empty, never null, when nothing matches.
    pub fn color_variants(&self, product: &Product, color: &str) -> Vec<Product> {
        sibling_color_matches(self.store, product, color)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Colors selectable among the product's sibling variants.
    pub fn available_colors(&self, product: &Product) -> Vec<String> {
        dedup_preserving_order(
            sibling_variants(self.store, product)
                .into_iter()
                .map(|v| v.color_token().to_string()),
        )
    }

    /// Sizes selectable among the product's sibling variants.
    pub fn available_sizes(&self, product: &Product) -> Vec<String> {
        dedup_preserving_order(
            sibling_variants(self.store, product)
                .into_iter()
                .map(|v| v.size_token().to_string()),
        )
    }

    /// Every color token across the whole catalog's variants.
    ///
    /// Scans all variants per call; acceptable for the catalog sizes this
    /// crate targets, a materialized attribute table at scale.
    pub fn all_colors(&self) -> Vec<String> {
        dedup_preserving_order(
            self.store
                .variants()
                .into_iter()
                .map(|v| v.color_token().to_string()),
        )
    }

    /// Every size token across the whole catalog's variants.
    pub fn all_sizes(&self) -> Vec<String> {
        dedup_preserving_order(
            self.store
                .variants()
                .into_iter()
                .map(|v| v.size_token().to_string()),
        )
    }

    /// Products never referenced as a parent (leaf/standalone items).
    ///
    /// Falls back to all active products when no product has children, a
    /// guard inherited from the original catalog query rather than a
    /// business rule.
    pub fn without_parents(&self) -> Vec<Product> {
        let products = self.store.products();
        let parent_ids: Vec<&ProductId> =
            products.iter().filter_map(|p| p.parent_id.as_ref()).collect();
        if parent_ids.is_empty() {
            return self
                .store
                .active_products()
                .into_iter()
                .cloned()
                .collect();
        }
        products
            .iter()
            .filter(|p| !parent_ids.contains(&&p.id))
            .cloned()
            .collect()
    }

    /// Run catalog search filters.
    pub fn search(&self, filters: &SearchFilters) -> Result<Vec<Product>, CommerceError> {
        filters.apply(self.store)
    }

    /// Current stock for the exact product (no roll-up across the
    /// parent/variant relation).
    pub fn stock(&self, product: &Product) -> i64 {
        self.store.stock(&product.id)
    }

    /// Whether the product counts as in stock: delegated to the default
    /// variant when one exists; untracked stock is always in stock;
    /// otherwise the summed adjustments must be at least one.
    pub fn in_stock(&self, product: &Product) -> bool {
        if let Some(default_variant) = self.default_variant(product) {
            return self.in_stock(default_variant);
        }
        if !product.stock_control {
            return true;
        }
        self.stock(product) > 0
    }

    /// Whether the product can be ordered as-is: active and fully
    /// resolved (no variants still needing selection).
    pub fn orderable(&self, product: &Product) -> bool {
        product.active && self.store.children_of(&product.id).is_empty()
    }

    /// Effective price: the default variant's when one exists.
    pub fn price_of(&self, product: &Product) -> Money {
        self.default_variant(product)
            .map(|v| v.price)
            .unwrap_or(product.price)
    }

    /// The product's catalog role.
    pub fn role_of(&self, product: &Product) -> Role {
        product.role(!self.store.children_of(&product.id).is_empty())
    }

    /// Description, inherited from the parent for variants.
    pub fn description_for(&self, product: &Product) -> Option<String> {
        if let Some(parent) = self.parent_of(product) {
            return parent.description.clone();
        }
        product.description.clone()
    }

    /// Short description, inherited from the parent for variants.
    pub fn short_description_for(&self, product: &Product) -> Option<String> {
        if let Some(parent) = self.parent_of(product) {
            return parent.short_description.clone();
        }
        product.short_description.clone()
    }

    /// Display name qualified by the parent for variants.
    pub fn full_name(&self, product: &Product) -> String {
        product.full_name(self.parent_of(product))
    }

    fn parent_of(&self, product: &Product) -> Option<&'a Product> {
        product
            .parent_id
            .as_ref()
            .and_then(|id| self.store.find_by_id(id))
    }

    fn default_variant(&self, product: &Product) -> Option<&'a Product> {
        self.store
            .children_of(&product.id)
            .into_iter()
            .find(|c| c.default)
    }

    fn resolve_facts(&self, product: &Product) -> ResolvedProduct {
        ResolvedProduct {
            available_colors: self.available_colors(product),
            available_sizes: self.available_sizes(product),
            price: self.price_of(product),
            stock: self.stock(product),
            in_stock: self.in_stock(product),
            orderable: self.orderable(product),
            description: self.description_for(product),
            short_description: self.short_description_for(product),
            full_name: self.full_name(product),
            product: product.clone(),
        }
    }
}

/// The product's variant context: its parent's children when it is a
/// variant, its own children otherwise.
fn sibling_variants<'s, S: CatalogStore>(store: &'s S, product: &Product) -> Vec<&'s Product> {
    match &product.parent_id {
        Some(parent_id) => store.children_of(parent_id),
        None => store.children_of(&product.id),
    }
}

fn sibling_color_matches<'s, S: CatalogStore>(
    store: &'s S,
    product: &Product,
    color: &str,
) -> Vec<&'s Product> {
    sibling_variants(store, product)
        .into_iter()
        .filter(|v| like_match(&v.name, color))
        .collect()
}

fn dedup_preserving_order(tokens: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use crate::store::MemoryCatalog;

    fn price(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn insert_root(store: &mut MemoryCatalog, name: &str, sku: &str) -> ProductId {
        let category = store.find_or_create_category("Phones");
        let mut product = Product::new(name, sku, price(59_900));
        product.description = Some("A phone.".into());
        product.short_description = Some("Phone.".into());
        product.add_category(category);
        store.insert_product(product).unwrap()
    }

    fn insert_variant(
        store: &mut MemoryCatalog,
        parent_id: &ProductId,
        name: &str,
        sku: &str,
        cents: i64,
        default: bool,
    ) -> ProductId {
        let mut variant = Product::variant_of(parent_id.clone(), name, sku, price(cents));
        variant.default = default;
        store.insert_product(variant).unwrap()
    }

    /// Root "Phone" with Black-64GB (default), Black-128GB, White-64GB.
    fn phone_catalog() -> (MemoryCatalog, ProductId) {
        let mut store = MemoryCatalog::new();
        let root_id = insert_root(&mut store, "Phone", "SKU-1");
        insert_variant(&mut store, &root_id, "Black-64GB", "SKU-2", 49_900, true);
        insert_variant(&mut store, &root_id, "Black-128GB", "SKU-3", 59_900, false);
        insert_variant(&mut store, &root_id, "White-64GB", "SKU-4", 49_900, false);
        (store, root_id)
    }

    #[test]
    fn test_display_descends_to_default_variant() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let resolved = resolver.resolve_for_display("phone", None).unwrap();
        assert_eq!(resolved.product.name, "Black-64GB");
        // Never a product that still has children.
        assert!(store.children_of(&resolved.product.id).is_empty());
    }

    #[test]
    fn test_display_falls_back_to_first_variant_without_default() {
        let mut store = MemoryCatalog::new();
        let root_id = insert_root(&mut store, "Phone", "SKU-1");
        insert_variant(&mut store, &root_id, "Black-64GB", "SKU-2", 49_900, false);
        insert_variant(&mut store, &root_id, "White-64GB", "SKU-3", 49_900, false);

        let resolver = Resolver::new(&store);
        let resolved = resolver.resolve_for_display("phone", None).unwrap();
        assert_eq!(resolved.product.name, "Black-64GB");
    }

    #[test]
    fn test_display_color_selection_re_resolves() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let resolved = resolver.resolve_for_display("phone", Some("White")).unwrap();
        assert_eq!(resolved.product.name, "White-64GB");
    }

    #[test]
    fn test_display_retains_current_on_unmatched_color() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let resolved = resolver.resolve_for_display("phone", Some("Green")).unwrap();
        assert_eq!(resolved.product.name, "Black-64GB");
    }

    #[test]
    fn test_display_not_found() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve_for_display("tablet", None),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_display_facts() {
        let (mut store, _) = phone_catalog();
        let black_id = store.find_active_by_permalink("black-64gb").unwrap().id.clone();
        store.append_adjustment(&black_id, 4, "Received").unwrap();

        let resolver = Resolver::new(&store);
        let resolved = resolver.resolve_for_display("phone", None).unwrap();
        assert_eq!(resolved.available_colors, vec!["Black", "White"]);
        assert_eq!(resolved.available_sizes, vec!["64GB", "128GB"]);
        assert_eq!(resolved.price.amount_cents, 49_900);
        assert_eq!(resolved.stock, 4);
        assert!(resolved.in_stock);
        assert!(resolved.orderable);
        // Variants inherit the root's copy.
        assert_eq!(resolved.description.as_deref(), Some("A phone."));
        assert_eq!(resolved.full_name, "Phone (Black-64GB)");
    }

    #[test]
    fn test_purchase_exact_color_and_size() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let outcome = resolver
            .resolve_for_purchase("phone", Some("Black"), Some("64GB"))
            .unwrap();
        let product = outcome.resolved().unwrap();
        assert_eq!(product.name, "Black-64GB");
    }

    #[test]
    fn test_purchase_unmatched_selection_is_no_match() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let outcome = resolver
            .resolve_for_purchase("phone", Some("Black"), Some("256GB"))
            .unwrap();
        assert!(outcome.is_no_match());
    }

    #[test]
    fn test_purchase_color_only_unmatched_is_no_match() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let outcome = resolver
            .resolve_for_purchase("phone", Some("Green"), None)
            .unwrap();
        assert!(outcome.is_no_match());
    }

    #[test]
    fn test_purchase_color_only_takes_first_sibling() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        let outcome = resolver
            .resolve_for_purchase("phone", Some("Black"), None)
            .unwrap();
        // First in insertion order among Black matches.
        assert_eq!(outcome.resolved().unwrap().name, "Black-64GB");
    }

    #[test]
    fn test_purchase_without_selection_returns_product_unchanged() {
        let mut store = MemoryCatalog::new();
        insert_root(&mut store, "Charger", "SKU-9");
        let resolver = Resolver::new(&store);
        let outcome = resolver.resolve_for_purchase("charger", None, None).unwrap();
        assert_eq!(outcome.resolved().unwrap().name, "Charger");
    }

    #[test]
    fn test_purchase_missing_permalink_is_hard_error() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve_for_purchase("tablet", Some("Black"), Some("64GB")),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_color_variants_contract() {
        let (store, root_id) = phone_catalog();
        let resolver = Resolver::new(&store);
        let root = store.find_by_id(&root_id).unwrap();

        let blacks = resolver.color_variants(root, "Black");
        assert_eq!(blacks.len(), 2);
        for v in &blacks {
            assert_eq!(v.parent_id.as_ref(), Some(&root_id));
        }

        // From a variant, siblings come from the shared parent.
        let white = store.find_active_by_permalink("white-64gb").unwrap();
        let blacks_from_sibling = resolver.color_variants(white, "Black");
        assert_eq!(blacks_from_sibling.len(), 2);

        // Empty, not an error, when nothing matches.
        assert!(resolver.color_variants(root, "Green").is_empty());
    }

    #[test]
    fn test_all_colors_and_sizes_deduplicated() {
        let (store, _) = phone_catalog();
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.all_colors(), vec!["Black", "White"]);
        assert_eq!(resolver.all_sizes(), vec!["64GB", "128GB"]);
        // Tokens of a well-formed name never include the empty string.
        assert!(!resolver.all_colors().iter().any(|c| c.is_empty()));
        assert!(!resolver.all_sizes().iter().any(|s| s.is_empty()));
    }

    #[test]
    fn test_without_parents_excludes_roots_with_variants() {
        let (mut store, root_id) = phone_catalog();
        insert_root(&mut store, "Charger", "SKU-9");

        let resolver = Resolver::new(&store);
        let leaves = resolver.without_parents();
        assert!(leaves.iter().all(|p| p.id != root_id));
        assert!(leaves.iter().any(|p| p.name == "Charger"));
        assert!(leaves.iter().any(|p| p.name == "Black-64GB"));
    }

    #[test]
    fn test_without_parents_falls_back_to_active_when_no_children_exist() {
        let mut store = MemoryCatalog::new();
        insert_root(&mut store, "Charger", "SKU-9");
        let cable_id = insert_root(&mut store, "Cable", "SKU-10");
        store.deactivate_product(&cable_id).unwrap();

        let resolver = Resolver::new(&store);
        let leaves = resolver.without_parents();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].name, "Charger");
    }

    #[test]
    fn test_orderable_matches_active_for_childless_roots() {
        let mut store = MemoryCatalog::new();
        let id = insert_root(&mut store, "Charger", "SKU-9");
        {
            let resolver = Resolver::new(&store);
            let product = store.find_by_id(&id).unwrap();
            assert!(resolver.orderable(product));
        }
        store.deactivate_product(&id).unwrap();
        let resolver = Resolver::new(&store);
        let product = store.find_by_id(&id).unwrap();
        assert!(!resolver.orderable(product));
    }

    #[test]
    fn test_root_with_variants_is_not_orderable() {
        let (store, root_id) = phone_catalog();
        let resolver = Resolver::new(&store);
        let root = store.find_by_id(&root_id).unwrap();
        assert!(!resolver.orderable(root));
        assert_eq!(resolver.role_of(root), Role::Root);
    }

    #[test]
    fn test_in_stock_delegation_and_stock_control() {
        let (mut store, root_id) = phone_catalog();
        let resolver = Resolver::new(&store);
        let root = store.find_by_id(&root_id).unwrap();
        // Default variant has no stock yet.
        assert!(!resolver.in_stock(root));
        drop(resolver);

        let black_id = store.find_active_by_permalink("black-64gb").unwrap().id.clone();
        store.append_adjustment(&black_id, 1, "Received").unwrap();
        let resolver = Resolver::new(&store);
        let root = store.find_by_id(&root_id).unwrap();
        assert!(resolver.in_stock(root));

        // Untracked stock is always in stock.
        let mut untracked = Product::new("Gift Card", "SKU-GC", price(1_000));
        untracked.stock_control = false;
        assert!(Resolver::new(&store).in_stock(&untracked));
    }

    #[test]
    fn test_stock_does_not_roll_up() {
        let (mut store, root_id) = phone_catalog();
        let black_id = store.find_active_by_permalink("black-64gb").unwrap().id.clone();
        store.append_adjustment(&black_id, 10, "Received").unwrap();

        let resolver = Resolver::new(&store);
        let root = store.find_by_id(&root_id).unwrap();
        assert_eq!(resolver.stock(root), 0);
    }
}
