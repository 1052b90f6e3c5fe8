//! Catalog search filters.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::CategoryId;
use crate::store::{like_match, CatalogStore};
use serde::{Deserialize, Serialize};

/// Conjunctive catalog filters.
///
/// A category narrows the base set to that category's products (unknown
/// categories are an error); color and size narrow by case-insensitive
/// substring match against product names. An absent filter is a no-op,
/// so the empty filter set is "all active products".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchFilters {
    /// Restrict to one category's products.
    pub category_id: Option<CategoryId>,
    /// Substring matched against product names (variant color token).
    pub color: Option<String>,
    /// Substring matched against product names (variant size token).
    pub size: Option<String>,
}

impl SearchFilters {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Narrow by color substring.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Narrow by size substring.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Check if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.color.is_none() && self.size.is_none()
    }

    /// Run the filters against a store.
    ///
    /// Results keep the store's insertion order. A substring filter that
    /// matches nothing yields an empty vec, not an error.
    pub fn apply<S: CatalogStore>(&self, store: &S) -> Result<Vec<Product>, CommerceError> {
        let base: Vec<&Product> = match &self.category_id {
            Some(category_id) => {
                if store.category_by_id(category_id).is_none() {
                    return Err(CommerceError::CategoryNotFound(category_id.to_string()));
                }
                store.products_in_category(category_id)
            }
            None => store.active_products(),
        };

        let matches = |product: &&Product| {
            self.color
                .as_deref()
                .map(|c| like_match(&product.name, c))
                .unwrap_or(true)
                && self
                    .size
                    .as_deref()
                    .map(|s| like_match(&product.name, s))
                    .unwrap_or(true)
        };

        Ok(base.into_iter().filter(|p| matches(p)).cloned().collect())
    }
}
