//! The catalog resolver.
//!
//! Translates a (permalink, optional color, optional size) request into
//! one concrete sellable product plus the selector facts a storefront
//! needs to render a variant picker.

mod resolver;

pub use resolver::{PurchaseOutcome, ResolvedProduct, Resolver};
