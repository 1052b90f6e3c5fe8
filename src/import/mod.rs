//! CSV catalog import.
//!
//! Rows create products, except where a product with the same name
//! already exists: those rows only append a stock adjustment, so
//! re-importing a sheet restocks instead of duplicating the catalog.
//! Unnamed rows are skipped, not errors.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use crate::store::CatalogStore;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Description recorded on adjustments created by import.
const IMPORT_ADJUSTMENT_DESCRIPTION: &str = "Imported";

/// One spreadsheet row, matched to columns by header name.
///
/// Every field is optional so sparse sheets parse; the row handler
/// decides what absence means per field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImportRow {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub weight: Option<String>,
    pub price: Option<String>,
    pub permalink: Option<String>,
    pub category_name: Option<String>,
    pub qty: Option<String>,
}

/// Summary of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows that created a new product.
    pub created: usize,
    /// Rows that matched an existing product name and appended stock.
    pub restocked: usize,
    /// Rows skipped for a blank name.
    pub skipped: usize,
}

/// Import catalog rows from CSV data.
pub fn import_csv<R: Read, S: CatalogStore>(
    store: &mut S,
    reader: R,
) -> Result<ImportReport, CommerceError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut report = ImportReport::default();
    for result in csv_reader.deserialize::<ImportRow>() {
        apply_row(store, result?, &mut report)?;
    }
    info!(
        created = report.created,
        restocked = report.restocked,
        skipped = report.skipped,
        "catalog import finished"
    );
    Ok(report)
}

/// Import catalog rows from a CSV file. Only `.csv` is parsed; other
/// spreadsheet extensions are rejected as an unknown format.
pub fn import_path<S: CatalogStore>(
    store: &mut S,
    path: &Path,
) -> Result<ImportReport, CommerceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => {
            let file = File::open(path)?;
            import_csv(store, file)
        }
        _ => Err(CommerceError::UnknownFormat(path.display().to_string())),
    }
}

fn apply_row<S: CatalogStore>(
    store: &mut S,
    row: ImportRow,
    report: &mut ImportReport,
) -> Result<(), CommerceError> {
    let name = match row.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            debug!("skipping import row with blank name");
            report.skipped += 1;
            return Ok(());
        }
    };

    let qty = parse_qty(row.qty.as_deref());

    // A row matching an existing product name restocks instead of
    // creating a duplicate. Two rows for the same name append two
    // separate adjustments.
    let existing_id = store
        .products()
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.id.clone());
    if let Some(product_id) = existing_id {
        if qty > 0 {
            store.append_adjustment(&product_id, qty, IMPORT_ADJUSTMENT_DESCRIPTION)?;
        }
        report.restocked += 1;
        return Ok(());
    }

    let price = match row.price.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        None => Money::zero(Currency::USD),
        Some(raw) => Money::parse(raw, Currency::USD).ok_or_else(|| {
            CommerceError::Validation(format!("price is not a number: {}", raw))
        })?,
    };
    let weight = match row.weight.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
        None => 0.0,
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .ok_or_else(|| {
                CommerceError::Validation(format!("weight is not a number: {}", raw))
            })?,
    };

    let mut product = Product::new(name, row.sku.unwrap_or_default(), price);
    product.description = row.description;
    product.short_description = row.short_description;
    product.weight = weight;
    product.permalink = row.permalink.unwrap_or_default();

    let category_id = store.find_or_create_category(row.category_name.as_deref().unwrap_or(""));
    product.add_category(category_id);

    let product_id = store.insert_product(product)?;
    if qty > 0 {
        store.append_adjustment(&product_id, qty, IMPORT_ADJUSTMENT_DESCRIPTION)?;
    }
    report.created += 1;
    Ok(())
}

/// Quantities parse leniently: blank or non-numeric cells count as zero.
fn parse_qty(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCatalog;

    const HEADER: &str = "name,sku,description,short_description,weight,price,permalink,category_name,qty";

    fn import(store: &mut MemoryCatalog, rows: &str) -> Result<ImportReport, CommerceError> {
        let data = format!("{}\n{}", HEADER, rows);
        import_csv(store, data.as_bytes())
    }

    #[test]
    fn test_import_creates_products_with_stock() {
        let mut store = MemoryCatalog::new();
        let report = import(
            &mut store,
            "Charger,SKU-1,A charger.,Charger.,0.2,19.99,charger,Accessories,5",
        )
        .unwrap();

        assert_eq!(report.created, 1);
        let product = store.find_active_by_permalink("charger").unwrap();
        assert_eq!(product.price.amount_cents, 1999);
        assert_eq!(store.stock(&product.id), 5);
        assert!(store.category_by_name("Accessories").is_some());
    }

    #[test]
    fn test_blank_name_rows_are_skipped() {
        let mut store = MemoryCatalog::new();
        let report = import(
            &mut store,
            ",SKU-1,desc,short,0.2,19.99,charger,Accessories,5\n\
             Charger,SKU-2,A charger.,Charger.,0.2,19.99,charger,Accessories,5",
        )
        .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.created, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_names_restock_with_separate_adjustments() {
        let mut store = MemoryCatalog::new();
        let report = import(
            &mut store,
            "Charger,SKU-1,A charger.,Charger.,0.2,19.99,charger,Accessories,5\n\
             Charger,,,,,,,,3",
        )
        .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.restocked, 1);
        assert_eq!(store.len(), 1);
        let id = store.find_active_by_permalink("charger").unwrap().id.clone();
        // Two separate adjustments of 5 and 3, not a merged 8.
        let adjustments = store.adjustments_for(&id);
        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].adjustment, 5);
        assert_eq!(adjustments[1].adjustment, 3);
        assert_eq!(store.stock(&id), 8);
    }

    #[test]
    fn test_categories_created_on_demand_and_reused() {
        let mut store = MemoryCatalog::new();
        import(
            &mut store,
            "Charger,SKU-1,A charger.,Charger.,0.2,19.99,charger,Accessories,1\n\
             Cable,SKU-2,A cable.,Cable.,0.1,9.99,cable,Accessories,1",
        )
        .unwrap();

        assert_eq!(store.categories().len(), 1);
        let category_id = store.category_by_name("Accessories").unwrap().id.clone();
        assert_eq!(store.products_in_category(&category_id).len(), 2);
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let mut store = MemoryCatalog::new();
        import(
            &mut store,
            "Charger,SKU-1,A charger.,Charger.,0.2,,charger,Accessories,0",
        )
        .unwrap();
        let product = store.find_active_by_permalink("charger").unwrap();
        assert!(product.price.is_zero());
        // qty 0 appends no adjustment.
        assert!(store.adjustments_for(&product.id).is_empty());
    }

    #[test]
    fn test_non_numeric_price_fails_validation() {
        let mut store = MemoryCatalog::new();
        let result = import(
            &mut store,
            "Charger,SKU-1,A charger.,Charger.,0.2,cheap,charger,Accessories,1",
        );
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_non_numeric_weight_fails_validation() {
        let mut store = MemoryCatalog::new();
        let result = import(
            &mut store,
            "Charger,SKU-1,A charger.,Charger.,heavy,19.99,charger,Accessories,1",
        );
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_non_finite_weight_fails_validation() {
        let mut store = MemoryCatalog::new();
        // f64 parsing accepts "inf" and "NaN"; neither is a usable weight.
        for cell in ["inf", "-inf", "NaN"] {
            let result = import(
                &mut store,
                &format!("Charger,SKU-1,A charger.,Charger.,{},19.99,charger,Accessories,1", cell),
            );
            assert!(matches!(result, Err(CommerceError::Validation(_))));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_permalink_derived_when_column_blank() {
        let mut store = MemoryCatalog::new();
        import(
            &mut store,
            "Travel Charger,SKU-1,A charger.,Charger.,0.2,19.99,,Accessories,1",
        )
        .unwrap();
        assert!(store.find_active_by_permalink("travel-charger").is_some());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut store = MemoryCatalog::new();
        let result = import_path(&mut store, Path::new("catalog.xlsx"));
        assert!(matches!(result, Err(CommerceError::UnknownFormat(_))));
    }
}
