//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog operations.
///
/// Lookup failures (`ProductNotFound`, `CategoryNotFound`) fail closed at
/// resolution time; validation variants are raised only at catalog-write
/// time. Substring-match misses are deliberately not errors anywhere in
/// this crate.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// No active product matches the permalink.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category lookup failed.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Permalink already taken by another product.
    #[error("Duplicate permalink: {0}")]
    DuplicatePermalink(String),

    /// A catalog-write validation failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Quantity must be positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow in a quantity or money calculation.
    #[error("Arithmetic overflow")]
    Overflow,

    /// Product is referenced by order lines and cannot be deleted.
    #[error("Product {0} has order lines and cannot be deleted")]
    ProductHasOrders(String),

    /// Import file format is not supported.
    #[error("Unknown import format: {0}")]
    UnknownFormat(String),

    /// CSV parse error during import.
    #[error("Import error: {0}")]
    Import(#[from] csv::Error),

    /// I/O error reading an import file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
