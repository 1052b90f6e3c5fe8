//! Catalog domain types and resolution logic for a storefront.
//!
//! This crate models a small product catalog in which a product family
//! ("root") can carry purchasable variants, and resolves a
//! (permalink, color, size) request down to one concrete sellable item:
//!
//! - **Catalog**: products, variants, categories, stock adjustments,
//!   attachments
//! - **Resolve**: display and purchase resolution, selector facts
//!   (available colors/sizes), derived commerce facts (price, stock,
//!   orderability)
//! - **Search**: conjunctive category/color/size filtering
//! - **Import**: CSV catalog import with restock-on-duplicate semantics
//! - **Order**: order-line collaborator fed by purchase resolution
//!
//! Persistence is a collaborator behind the [`store::CatalogStore`] trait;
//! [`store::MemoryCatalog`] is the in-process implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//!
//! let mut catalog = MemoryCatalog::new();
//! // ... insert a root product and its "Black-64GB" style variants ...
//!
//! let resolver = Resolver::new(&catalog);
//! let resolved = resolver.resolve_for_display("phone", Some("Black"))?;
//! println!("{} {}", resolved.product.name, resolved.price.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod import;
pub mod order;
pub mod resolve;
pub mod search;
pub mod store;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Attachment, AttachmentRole, Category, Product, Role, StockAdjustment,
    };

    // Store
    pub use crate::store::{CatalogStore, MemoryCatalog};

    // Resolve
    pub use crate::resolve::{PurchaseOutcome, ResolvedProduct, Resolver};

    // Search
    pub use crate::search::SearchFilters;

    // Import
    pub use crate::import::{import_csv, import_path, ImportReport, ImportRow};

    // Order
    pub use crate::order::{quantity_or_default, Order, OrderLine};
}
