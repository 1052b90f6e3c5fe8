//! Catalog search module.

mod filter;

pub use filter::SearchFilters;
