//! Product and variant types.

use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How a product participates in the catalog, derived from its parent
/// reference and whether anything references it as a parent.
///
/// The stored entity stays self-referential (one type playing all three
/// roles) because catalog data and the import format are shaped that way;
/// this view makes "is this directly sellable" a match instead of a flag
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// No parent, no children; sellable directly.
    Standalone,
    /// No parent, has children; browsing must descend to a variant.
    Root,
    /// Has a parent; one concrete purchasable combination.
    Variant,
}

/// A product in the catalog.
///
/// A product with no `parent_id` is a root (or standalone) product; a
/// product with a `parent_id` is a variant of that root. Variant identity
/// is encoded positionally in the name as `"<color>-<size>"`; see
/// [`Product::color_token`] and [`Product::size_token`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Parent product, when this is a variant.
    pub parent_id: Option<ProductId>,
    /// Product name. For variants this carries the color/size convention.
    pub name: String,
    /// URL-friendly slug (unique). Derived from the name at insert time
    /// when blank.
    pub permalink: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Full description. Required for roots, inherited by variants.
    pub description: Option<String>,
    /// Short description for listings. Required for roots.
    pub short_description: Option<String>,
    /// Shipping weight.
    pub weight: f64,
    /// Price. For roots with a default variant, the displayed price is
    /// delegated to that variant.
    pub price: Money,
    /// Cost price (for margin calculations).
    pub cost_price: Option<Money>,
    /// Whether the product is visible and resolvable.
    pub active: bool,
    /// Whether the product is featured on landing surfaces.
    pub featured: bool,
    /// Marks the default variant among siblings.
    pub default: bool,
    /// Whether stock is tracked for this product. Untracked products are
    /// always considered in stock.
    pub stock_control: bool,
    /// Categories this product belongs to.
    pub category_ids: Vec<CategoryId>,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Product {
    /// Create a new root/standalone product.
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: Money) -> Self {
        Self {
            id: ProductId::generate(),
            parent_id: None,
            name: name.into(),
            permalink: String::new(),
            sku: sku.into(),
            description: None,
            short_description: None,
            weight: 0.0,
            price,
            cost_price: None,
            active: true,
            featured: false,
            default: false,
            stock_control: true,
            category_ids: Vec::new(),
            created_at: current_timestamp(),
        }
    }

    /// Create a new variant of a parent product.
    pub fn variant_of(
        parent_id: ProductId,
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Money,
    ) -> Self {
        let mut product = Self::new(name, sku, price);
        product.parent_id = Some(parent_id);
        product
    }

    /// Check if this product is a variant (has a parent).
    pub fn is_variant(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Derive the catalog role from this product's parent reference and
    /// whether any product references it as a parent.
    pub fn role(&self, has_children: bool) -> Role {
        if self.parent_id.is_some() {
            Role::Variant
        } else if has_children {
            Role::Root
        } else {
            Role::Standalone
        }
    }

    /// The color token of a variant name: the first hyphen-delimited
    /// segment (e.g., `"Red"` for `"Red-Large"`). Empty when the name is
    /// empty.
    pub fn color_token(&self) -> &str {
        self.name.split('-').next().unwrap_or("")
    }

    /// The size token of a variant name: the second hyphen-delimited
    /// segment (e.g., `"Large"` for `"Red-Large"`). Empty when the name
    /// has no hyphen.
    pub fn size_token(&self) -> &str {
        self.name.split('-').nth(1).unwrap_or("")
    }

    /// The display name, qualified by the parent for variants, e.g.
    /// `"Phone (Black-64GB)"`.
    pub fn full_name(&self, parent: Option<&Product>) -> String {
        match parent {
            Some(parent) => format!("{} ({})", parent.name, self.name),
            None => self.name.clone(),
        }
    }

    /// Add a category to this product.
    pub fn add_category(&mut self, category_id: CategoryId) {
        if !self.category_ids.contains(&category_id) {
            self.category_ids.push(category_id);
        }
    }
}

/// Turn a product name into a URL-safe permalink: lowercase, with runs of
/// non-alphanumeric characters collapsed to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn price(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    #[test]
    fn test_product_creation() {
        let product = Product::new("Phone", "SKU-001", price(49_900));
        assert_eq!(product.name, "Phone");
        assert_eq!(product.sku, "SKU-001");
        assert!(product.active);
        assert!(!product.is_variant());
    }

    #[test]
    fn test_variant_creation() {
        let parent = Product::new("Phone", "SKU-001", price(49_900));
        let variant = Product::variant_of(parent.id.clone(), "Black-64GB", "SKU-001-B64", price(49_900));
        assert!(variant.is_variant());
        assert_eq!(variant.parent_id.as_ref(), Some(&parent.id));
    }

    #[test]
    fn test_name_tokens() {
        let parent = Product::new("Phone", "SKU-001", price(0));
        let variant = Product::variant_of(parent.id.clone(), "Red-Large", "SKU-002", price(0));
        assert_eq!(variant.color_token(), "Red");
        assert_eq!(variant.size_token(), "Large");

        // Names without a hyphen tokenize to an empty size.
        assert_eq!(parent.color_token(), "Phone");
        assert_eq!(parent.size_token(), "");
    }

    #[test]
    fn test_role() {
        let parent = Product::new("Phone", "SKU-001", price(0));
        let variant = Product::variant_of(parent.id.clone(), "Black-64GB", "SKU-002", price(0));

        assert_eq!(parent.role(true), Role::Root);
        assert_eq!(parent.role(false), Role::Standalone);
        assert_eq!(variant.role(false), Role::Variant);
    }

    #[test]
    fn test_full_name() {
        let parent = Product::new("Phone", "SKU-001", price(0));
        let variant = Product::variant_of(parent.id.clone(), "Black-64GB", "SKU-002", price(0));
        assert_eq!(variant.full_name(Some(&parent)), "Phone (Black-64GB)");
        assert_eq!(parent.full_name(None), "Phone");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust Programming Book"), "rust-programming-book");
        assert_eq!(slugify("Black-64GB"), "black-64gb");
        assert_eq!(slugify("  Weird -- name!  "), "weird-name");
        assert_eq!(slugify(""), "");
    }
}
