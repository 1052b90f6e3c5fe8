//! The persistence collaborator boundary.
//!
//! The resolver never owns persistence; it issues lookups through
//! [`CatalogStore`]. [`MemoryCatalog`] is the in-process implementation,
//! holding products in insertion order, which is the pinned ordering for
//! every "first match wins" operation in this crate.

use crate::catalog::{
    slugify, stock_total, Attachment, AttachmentRole, Category, Product, StockAdjustment,
};
use crate::error::CommerceError;
use crate::ids::{AdjustmentId, CategoryId, ProductId};
use crate::order::OrderLine;

/// Case-insensitive substring match, the in-process equivalent of
/// `LIKE '%needle%'`. An empty needle matches everything.
pub fn like_match(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Query surface the catalog resolver depends on.
///
/// Implementations must return products in a stable insertion order:
/// "first" throughout the resolver means earliest inserted.
pub trait CatalogStore {
    /// All products, in insertion order.
    fn products(&self) -> &[Product];

    /// Look up a product by id.
    fn find_by_id(&self, id: &ProductId) -> Option<&Product>;

    /// Look up an active product by its permalink.
    fn find_active_by_permalink(&self, permalink: &str) -> Option<&Product>;

    /// All categories.
    fn categories(&self) -> &[Category];

    /// Look up a category by id.
    fn category_by_id(&self, id: &CategoryId) -> Option<&Category>;

    /// Look up a category by exact name.
    fn category_by_name(&self, name: &str) -> Option<&Category>;

    /// Find a category by name, creating it when absent.
    fn find_or_create_category(&mut self, name: &str) -> CategoryId;

    /// Validate and insert a product, deriving the permalink from the
    /// name when blank.
    fn insert_product(&mut self, product: Product) -> Result<ProductId, CommerceError>;

    /// Soft-deactivate a product (kept while order history references it).
    fn deactivate_product(&mut self, id: &ProductId) -> Result<(), CommerceError>;

    /// Hard-delete a product. Restricted while order lines reference it.
    fn delete_product(&mut self, id: &ProductId) -> Result<(), CommerceError>;

    /// Append a stock adjustment for a product.
    fn append_adjustment(
        &mut self,
        product_id: &ProductId,
        adjustment: i64,
        description: &str,
    ) -> Result<AdjustmentId, CommerceError>;

    /// All adjustments recorded for a product, oldest first.
    fn adjustments_for(&self, product_id: &ProductId) -> Vec<&StockAdjustment>;

    /// Record an order line against a product (the append-only write the
    /// purchase path hands to the order subsystem).
    fn record_order_line(&mut self, line: OrderLine);

    /// Whether any order line references the product.
    fn has_order_lines(&self, product_id: &ProductId) -> bool;

    /// Attach a file reference to a product.
    fn add_attachment(&mut self, attachment: Attachment);

    /// Attachments for a product in a given role.
    fn attachments_for(&self, product_id: &ProductId, role: AttachmentRole) -> Vec<&Attachment>;

    /// Current stock level: the sum of all adjustments for this exact
    /// product.
    fn stock(&self, product_id: &ProductId) -> i64 {
        stock_total(self.adjustments_for(product_id).into_iter())
    }

    /// All active products, in insertion order.
    fn active_products(&self) -> Vec<&Product> {
        self.products().iter().filter(|p| p.active).collect()
    }

    /// All featured products.
    fn featured_products(&self) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| p.active && p.featured)
            .collect()
    }

    /// The variants of a parent product, in insertion order.
    fn children_of(&self, parent_id: &ProductId) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| p.parent_id.as_ref() == Some(parent_id))
            .collect()
    }

    /// Every variant in the catalog (any product with a parent).
    fn variants(&self) -> Vec<&Product> {
        self.products().iter().filter(|p| p.is_variant()).collect()
    }

    /// Products belonging to a category.
    fn products_in_category(&self, category_id: &CategoryId) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| p.category_ids.contains(category_id))
            .collect()
    }

    /// The attachment shown as the product's default image.
    fn default_image(&self, product_id: &ProductId) -> Option<&Attachment> {
        self.attachments_for(product_id, AttachmentRole::DefaultImage)
            .into_iter()
            .next()
    }

    /// The product's data sheet attachment.
    fn data_sheet(&self, product_id: &ProductId) -> Option<&Attachment> {
        self.attachments_for(product_id, AttachmentRole::DataSheet)
            .into_iter()
            .next()
    }
}

/// In-memory catalog store.
///
/// Linear scans are deliberate: the catalog sizes this crate targets make
/// indexed lookups unnecessary, and insertion order doubles as the
/// deterministic tie-break.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    adjustments: Vec<StockAdjustment>,
    attachments: Vec<Attachment>,
    order_lines: Vec<OrderLine>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn validate(&self, product: &Product) -> Result<(), CommerceError> {
        if product.name.trim().is_empty() {
            return Err(CommerceError::Validation("name must not be blank".into()));
        }
        if product.sku.trim().is_empty() {
            return Err(CommerceError::Validation("sku must not be blank".into()));
        }
        // Roots must be presentable on their own; variants inherit these
        // from their parent.
        if product.parent_id.is_none() {
            if product.category_ids.is_empty() {
                return Err(CommerceError::Validation(
                    "must have at least one product category".into(),
                ));
            }
            if product.description.as_deref().unwrap_or("").trim().is_empty() {
                return Err(CommerceError::Validation(
                    "description must not be blank".into(),
                ));
            }
            if product
                .short_description
                .as_deref()
                .unwrap_or("")
                .trim()
                .is_empty()
            {
                return Err(CommerceError::Validation(
                    "short description must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}

impl CatalogStore for MemoryCatalog {
    fn products(&self) -> &[Product] {
        &self.products
    }

    fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn find_active_by_permalink(&self, permalink: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.active && p.permalink == permalink)
    }

    fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn category_by_id(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    fn find_or_create_category(&mut self, name: &str) -> CategoryId {
        if let Some(existing) = self.categories.iter().find(|c| c.name == name) {
            return existing.id.clone();
        }
        let category = Category::new(name);
        let id = category.id.clone();
        self.categories.push(category);
        id
    }

    fn insert_product(&mut self, mut product: Product) -> Result<ProductId, CommerceError> {
        if product.permalink.trim().is_empty() {
            product.permalink = slugify(&product.name);
        }
        if product.permalink.is_empty() {
            return Err(CommerceError::Validation(
                "permalink must not be blank".into(),
            ));
        }
        if self.products.iter().any(|p| p.permalink == product.permalink) {
            return Err(CommerceError::DuplicatePermalink(product.permalink));
        }
        self.validate(&product)?;
        let id = product.id.clone();
        self.products.push(product);
        Ok(id)
    }

    fn deactivate_product(&mut self, id: &ProductId) -> Result<(), CommerceError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        product.active = false;
        Ok(())
    }

    fn delete_product(&mut self, id: &ProductId) -> Result<(), CommerceError> {
        if self.find_by_id(id).is_none() {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        if self.has_order_lines(id) {
            return Err(CommerceError::ProductHasOrders(id.to_string()));
        }
        self.products.retain(|p| &p.id != id);
        self.adjustments.retain(|a| &a.product_id != id);
        self.attachments.retain(|a| &a.product_id != id);
        Ok(())
    }

    fn append_adjustment(
        &mut self,
        product_id: &ProductId,
        adjustment: i64,
        description: &str,
    ) -> Result<AdjustmentId, CommerceError> {
        if self.find_by_id(product_id).is_none() {
            return Err(CommerceError::ProductNotFound(product_id.to_string()));
        }
        let record = StockAdjustment::new(product_id.clone(), adjustment, description);
        let id = record.id.clone();
        self.adjustments.push(record);
        Ok(id)
    }

    fn adjustments_for(&self, product_id: &ProductId) -> Vec<&StockAdjustment> {
        self.adjustments
            .iter()
            .filter(|a| &a.product_id == product_id)
            .collect()
    }

    fn record_order_line(&mut self, line: OrderLine) {
        self.order_lines.push(line);
    }

    fn has_order_lines(&self, product_id: &ProductId) -> bool {
        self.order_lines
            .iter()
            .any(|line| &line.product_id == product_id)
    }

    fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    fn attachments_for(&self, product_id: &ProductId, role: AttachmentRole) -> Vec<&Attachment> {
        self.attachments
            .iter()
            .filter(|a| &a.product_id == product_id && a.role == role)
            .collect()
    }
}
