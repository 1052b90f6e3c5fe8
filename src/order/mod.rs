//! The order-line collaborator.
//!
//! Purchase resolution hands a resolved product and a quantity to the
//! caller-scoped current order. Order lifecycle beyond appending lines
//! (payment, fulfillment) lives outside this crate.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{OrderId, OrderLineId, ProductId};
use crate::money::{Currency, Money};
use crate::store::CatalogStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum quantity allowed per order line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Parse a raw quantity parameter: absent means 1, anything that does not
/// parse as a non-negative integer means 0 (which the order then rejects).
pub fn quantity_or_default(raw: Option<&str>) -> i64 {
    match raw {
        None => 1,
        Some(s) => s.trim().parse::<i64>().ok().filter(|q| *q >= 0).unwrap_or(0),
    }
}

/// A line on an order: one product at a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Unique line identifier.
    pub id: OrderLineId,
    /// Owning order.
    pub order_id: OrderId,
    /// The resolved product (root, standalone, or variant).
    pub product_id: ProductId,
    /// Product name at time of ordering.
    pub product_name: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at time of ordering.
    pub unit_price: Money,
}

impl OrderLine {
    /// Create a line for a resolved product.
    pub fn for_product(order_id: OrderId, product: &Product, quantity: i64) -> Self {
        Self {
            id: OrderLineId::generate(),
            order_id,
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
        }
    }

    /// Line total (unit price times quantity).
    pub fn total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// The caller-scoped current order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Lines on this order.
    pub lines: Vec<OrderLine>,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Order {
    /// Create a new empty order.
    pub fn new() -> Self {
        Self {
            id: OrderId::generate(),
            lines: Vec::new(),
            created_at: current_timestamp(),
        }
    }

    /// Append a resolved product to the order.
    ///
    /// A line for the same product merges by incrementing its quantity.
    /// New lines are recorded with the store so product deletion stays
    /// restricted while order history references the product.
    pub fn add_item<S: CatalogStore>(
        &mut self,
        store: &mut S,
        product: &Product,
        quantity: i64,
    ) -> Result<OrderLineId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_LINE {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }
            existing.quantity = new_quantity;
            return Ok(existing.id.clone());
        }

        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        let line = OrderLine::for_product(self.id.clone(), product, quantity);
        let id = line.id.clone();
        debug!(order = %self.id, product = %product.id, quantity, "order line added");
        store.record_order_line(line.clone());
        self.lines.push(line);
        Ok(id)
    }

    /// Order total across all lines.
    ///
    /// # Panics
    /// Panics if lines carry mismatched currencies.
    pub fn total(&self) -> Money {
        let currency = self
            .lines
            .first()
            .map(|l| l.unit_price.currency)
            .unwrap_or(Currency::USD);
        self.lines
            .iter()
            .fold(Money::zero(currency), |acc, line| acc + line.total())
    }

    /// Check if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
