//! CSV export of the item table.
//!
//! Columns: `id,name,stock,category,costprice,sellingprice,barcode`.
//! Prices are plain two-place decimals, a missing category is an empty cell.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use stockroom_core::Item;
use tracing::info;

use crate::error::ExportError;

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    name: &'a str,
    stock: i64,
    category: &'a str,
    costprice: String,
    sellingprice: String,
    barcode: &'a str,
}

impl<'a> From<&'a Item> for CsvRow<'a> {
    fn from(item: &'a Item) -> Self {
        CsvRow {
            id: item.id,
            name: &item.name,
            stock: item.stock,
            category: item.category.as_deref().unwrap_or(""),
            costprice: item.costprice.to_string(),
            sellingprice: item.sellingprice.to_string(),
            barcode: &item.barcode,
        }
    }
}

/// Header row, also written when there are no items.
pub const CSV_HEADER: [&str; 7] = [
    "id",
    "name",
    "stock",
    "category",
    "costprice",
    "sellingprice",
    "barcode",
];

/// Writes `items` as CSV with a header row.
pub fn write_csv<'a, W: Write>(
    items: impl IntoIterator<Item = &'a Item>,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for item in items {
        csv.serialize(CsvRow::from(item))?;
    }
    csv.flush()?;
    Ok(())
}

/// CSV text for `items`.
pub fn to_csv_string<'a>(items: impl IntoIterator<Item = &'a Item>) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(items, &mut buf)?;
    // csv output of UTF-8 input is UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the export to `path`, replacing any existing file.
pub fn export_to_path<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    path: &Path,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(items, file)?;
    info!(path = %path.display(), "Exported items to CSV");
    Ok(())
}
