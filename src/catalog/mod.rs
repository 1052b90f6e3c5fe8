//! Product catalog module.
//!
//! Contains types for products, variants, categories, stock adjustments,
//! and attachments.

mod attachment;
mod category;
mod product;
mod stock;

pub use attachment::{Attachment, AttachmentRole};
pub use category::Category;
pub use product::{slugify, Product, Role};
pub use stock::{stock_total, StockAdjustment};
