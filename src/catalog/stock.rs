//! Stock level adjustments.
//!
//! Stock is never stored as a counter. Each receipt, sale, or correction
//! appends an immutable signed delta, and the current level is the sum of
//! all deltas for the exact product (no roll-up between roots and
//! variants).

use crate::ids::{AdjustmentId, ProductId};
use serde::{Deserialize, Serialize};

/// An append-only stock level adjustment for one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAdjustment {
    /// Unique adjustment identifier.
    pub id: AdjustmentId,
    /// Product (root or variant) this adjustment applies to.
    pub product_id: ProductId,
    /// Signed change in stock level.
    pub adjustment: i64,
    /// Why the adjustment happened (e.g., "Imported").
    pub description: String,
    /// Unix timestamp of the adjustment.
    pub created_at: i64,
}

impl StockAdjustment {
    /// Create a new adjustment.
    pub fn new(product_id: ProductId, adjustment: i64, description: impl Into<String>) -> Self {
        Self {
            id: AdjustmentId::generate(),
            product_id,
            adjustment,
            description: description.into(),
            created_at: current_timestamp(),
        }
    }
}

/// Sum a product's adjustments into its current stock level.
pub fn stock_total<'a>(adjustments: impl Iterator<Item = &'a StockAdjustment>) -> i64 {
    adjustments.map(|a| a.adjustment).sum()
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
