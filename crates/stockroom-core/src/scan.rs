//! Barcode lookup against the item list the client already holds.
//!
//! Matching never queries the store: the scanner compares the decoded text
//! with the snapshot loaded by the last `GET /items`.

use std::collections::BTreeMap;

use crate::types::Item;

/// First item whose barcode equals `barcode` exactly, in slice order.
///
/// ```rust
/// use stockroom_core::scan::match_barcode;
///
/// assert!(match_barcode("123", &[]).is_none());
/// ```
pub fn match_barcode<'a>(barcode: &str, items: &'a [Item]) -> Option<&'a Item> {
    items.iter().find(|item| item.barcode == barcode)
}

/// Barcodes carried by more than one item, with the ids sharing each.
///
/// [`match_barcode`] resolves these to the lowest-positioned item, so the
/// UI lists them as a warning.
pub fn duplicate_barcodes(items: &[Item]) -> BTreeMap<&str, Vec<i64>> {
    let mut seen: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for item in items {
        seen.entry(item.barcode.as_str()).or_default().push(item.id);
    }
    seen.retain(|_, ids| ids.len() > 1);
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    fn item(id: i64, barcode: &str) -> Item {
        Item {
            id,
            name: format!("item-{}", id),
            category: Some("Sports".to_string()),
            stock: 3,
            costprice: Money::from_major_minor(10, 0),
            sellingprice: Money::from_major_minor(15, 0),
            barcode: barcode.to_string(),
            format: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_known_barcode_matches() {
        let items = vec![item(1, "123"), item(2, "456")];
        assert_eq!(match_barcode("123", &items).map(|i| i.id), Some(1));
    }

    #[test]
    fn test_unknown_barcode_is_none() {
        let items = vec![item(1, "123")];
        assert!(match_barcode("999", &items).is_none());
        // exact equality only
        assert!(match_barcode("12", &items).is_none());
        assert!(match_barcode(" 123", &items).is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let items = vec![item(1, "123"), item(2, "777"), item(3, "123")];
        assert_eq!(match_barcode("123", &items).map(|i| i.id), Some(1));

        let dups = duplicate_barcodes(&items);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups["123"], vec![1, 3]);
    }
}
