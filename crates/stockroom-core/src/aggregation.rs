//! # Aggregation Module
//!
//! Report figures derived from a loaded item list.
//!
//! ## Where These Are Used
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Views                                       │
//! │                                                                         │
//! │  GET /items ──► Vec<Item> (client snapshot)                            │
//! │                     │                                                   │
//! │      ┌──────────────┼──────────────┬───────────────┬───────────────┐   │
//! │      ▼              ▼              ▼               ▼               ▼   │
//! │   totals()     low_stock()   group_by_category()  rank()   filter_and_sort()
//! │   header       warning list  category chart       top/bottom  table view│
//! │                                                                         │
//! │  Every function is pure and recomputed on each change.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Item;
use crate::ALL_CATEGORIES;

// =============================================================================
// Totals
// =============================================================================

/// Headline numbers for the dashboard and report header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    /// Number of distinct items.
    pub count: usize,
    /// Σ stock.
    pub total_stock: i64,
    /// Σ sellingprice × stock.
    #[ts(type = "number")]
    pub inventory_value: Money,
}

pub fn totals(items: &[Item]) -> Totals {
    Totals {
        count: items.len(),
        total_stock: items.iter().map(|i| i.stock).fold(0, i64::saturating_add),
        inventory_value: items.iter().map(Item::revenue_value).sum(),
    }
}

// =============================================================================
// Low Stock
// =============================================================================

/// Items whose stock is at or below `threshold`, in input order.
///
/// Pass [`crate::LOW_STOCK_THRESHOLD`] so the table highlight and the
/// report list agree.
pub fn low_stock(items: &[Item], threshold: i64) -> Vec<&Item> {
    items.iter().filter(|i| i.is_low_stock(threshold)).collect()
}

// =============================================================================
// Category Breakdown
// =============================================================================

/// Per-category stock and value figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySummary {
    pub stock: i64,
    #[ts(type = "number")]
    pub cost: Money,
    #[ts(type = "number")]
    pub revenue: Money,
    #[ts(type = "number")]
    pub profit: Money,
}

/// Groups items by category, blank categories under `"Misc"`.
///
/// Keys are sorted so charts render in a stable order.
pub fn group_by_category(items: &[Item]) -> BTreeMap<String, CategorySummary> {
    let mut groups: BTreeMap<String, CategorySummary> = BTreeMap::new();

    for item in items {
        let entry = groups.entry(item.category_or_misc().to_string()).or_default();
        entry.stock = entry.stock.saturating_add(item.stock);
        entry.cost += item.cost_value();
        entry.revenue += item.revenue_value();
    }

    for summary in groups.values_mut() {
        summary.profit = summary.revenue - summary.cost;
    }

    groups
}

// =============================================================================
// Ranking
// =============================================================================

/// The figure items are ranked by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    Revenue,
    Profit,
    Stock,
}

/// `Top` is highest first, `Bottom` lowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Top,
    Bottom,
}

fn rank_key(item: &Item, by: RankBy) -> i64 {
    match by {
        RankBy::Revenue => item.revenue_value().minor_units(),
        RankBy::Profit => item.profit_value().minor_units(),
        RankBy::Stock => item.stock,
    }
}

/// Top or bottom `limit` performers. Ties keep input order.
pub fn rank(items: &[Item], by: RankBy, direction: Direction, limit: usize) -> Vec<&Item> {
    let mut ranked: Vec<&Item> = items.iter().collect();
    ranked.sort_by(|a, b| {
        let ord = rank_key(a, by).cmp(&rank_key(b, by));
        match direction {
            Direction::Top => ord.reverse(),
            Direction::Bottom => ord,
        }
    });
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Filter & Sort
// =============================================================================

/// Table sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Store order, no sorting.
    #[default]
    None,
    /// Lexicographic by name.
    Name,
    /// Highest stock first.
    Stock,
}

/// Search box, category dropdown and sort selector of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemQuery {
    pub search: String,
    /// A category name or `"All"`.
    pub category: String,
    pub sort: SortKey,
}

impl Default for ItemQuery {
    fn default() -> Self {
        ItemQuery {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort: SortKey::None,
        }
    }
}

impl ItemQuery {
    fn matches(&self, item: &Item, needle: &str) -> bool {
        let text_match = needle.is_empty()
            || item.name.to_lowercase().contains(needle)
            || item.barcode.contains(self.search.trim());

        let category_match =
            self.category == ALL_CATEGORIES || item.category.as_deref() == Some(self.category.as_str());

        text_match && category_match
    }
}

/// Applies the table's search, category filter and sort.
///
/// Name matching is case-insensitive, barcode matching is exact substring.
/// Sorting is stable, so equal keys keep store order.
pub fn filter_and_sort<'a>(items: &'a [Item], query: &ItemQuery) -> Vec<&'a Item> {
    let needle = query.search.trim().to_lowercase();

    let mut visible: Vec<&Item> = items.iter().filter(|i| query.matches(i, &needle)).collect();

    match query.sort {
        SortKey::None => {}
        SortKey::Name => visible.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Stock => visible.sort_by(|a, b| b.stock.cmp(&a.stock)),
    }

    visible
}

/// Distinct categories present in `items`, sorted, for the filter dropdown.
pub fn categories(items: &[Item]) -> Vec<String> {
    let mut names: Vec<String> = items
        .iter()
        .filter_map(|i| i.category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LOW_STOCK_THRESHOLD, MAX_PRICE, MAX_STOCK};
    use chrono::Utc;

    fn item(id: i64, name: &str, category: Option<&str>, stock: i64, cost: i64, sell: i64) -> Item {
        Item {
            id,
            name: name.to_string(),
            category: category.map(str::to_string),
            stock,
            costprice: Money::from_major_minor(cost, 0),
            sellingprice: Money::from_major_minor(sell, 0),
            barcode: format!("{:03}", id * 111),
            format: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn shelf() -> Vec<Item> {
        vec![
            item(1, "Ball", Some("Sports"), 3, 10, 15),
            item(2, "bat", Some("Sports"), 12, 20, 35),
            item(3, "Apple", Some("Food"), 40, 1, 2),
            item(4, "Widget", None, 5, 4, 3),
        ]
    }

    #[test]
    fn test_reports_over_largest_items() {
        let mut items = shelf();
        for it in items.iter_mut() {
            it.stock = MAX_STOCK;
            it.costprice = MAX_PRICE;
            it.sellingprice = MAX_PRICE;
        }
        let per_item = MAX_PRICE.multiply_quantity(MAX_STOCK);

        let t = totals(&items);
        assert_eq!(t.total_stock, 4 * MAX_STOCK);
        assert_eq!(t.inventory_value, per_item * 4);

        let groups = group_by_category(&items);
        assert_eq!(groups["Sports"].revenue, per_item * 2);
        assert!(groups["Sports"].profit.is_zero());
        assert_eq!(rank(&items, RankBy::Revenue, Direction::Top, 5).len(), 4);

        // rows written outside validation still do not panic
        items[0].stock = i64::MAX;
        items[0].sellingprice = Money::from_minor_units(i64::MAX);
        let t = totals(&items);
        assert_eq!(t.inventory_value.minor_units(), i64::MAX);
    }

    #[test]
    fn test_totals() {
        let t = totals(&shelf());
        assert_eq!(t.count, 4);
        assert_eq!(t.total_stock, 60);
        // 45 + 420 + 80 + 15
        assert_eq!(t.inventory_value, Money::from_major_minor(560, 0));

        let empty = totals(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.total_stock, 0);
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let items = shelf();
        let low: Vec<i64> = low_stock(&items, LOW_STOCK_THRESHOLD)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(low, vec![1, 4]);
    }

    #[test]
    fn test_low_stock_tracks_stock_changes() {
        let mut items = shelf();
        items[0].stock = LOW_STOCK_THRESHOLD + 1;
        assert!(low_stock(&items, LOW_STOCK_THRESHOLD).iter().all(|i| i.id != 1));

        items[1].stock = LOW_STOCK_THRESHOLD - 1;
        assert!(low_stock(&items, LOW_STOCK_THRESHOLD).iter().any(|i| i.id == 2));
    }

    #[test]
    fn test_group_by_category() {
        let groups = group_by_category(&shelf());
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Food", "Misc", "Sports"]);

        let sports = groups["Sports"];
        assert_eq!(sports.stock, 15);
        assert_eq!(sports.cost, Money::from_major_minor(270, 0));
        assert_eq!(sports.revenue, Money::from_major_minor(465, 0));
        assert_eq!(sports.profit, Money::from_major_minor(195, 0));

        let misc = groups["Misc"];
        assert_eq!(misc.profit, Money::from_major_minor(-5, 0));
    }

    #[test]
    fn test_group_revenue_reconciles_with_items() {
        let items = shelf();
        let by_group: Money = group_by_category(&items).values().map(|s| s.revenue).sum();
        let by_item: Money = items.iter().map(Item::revenue_value).sum();
        assert_eq!(by_group, by_item);
    }

    #[test]
    fn test_single_item_scenario() {
        let items = vec![item(1, "Ball", Some("Sports"), 3, 10, 15)];
        let groups = group_by_category(&items);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["Sports"].cost, Money::from_major_minor(30, 0));
        assert_eq!(groups["Sports"].revenue, Money::from_major_minor(45, 0));
        assert_eq!(groups["Sports"].profit, Money::from_major_minor(15, 0));
    }

    #[test]
    fn test_rank_top_and_bottom() {
        let items = shelf();
        let top: Vec<i64> = rank(&items, RankBy::Revenue, Direction::Top, 2)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(top, vec![2, 3]);

        let bottom: Vec<i64> = rank(&items, RankBy::Revenue, Direction::Bottom, 5)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(bottom, vec![4, 1, 3, 2]);

        let by_stock: Vec<i64> = rank(&items, RankBy::Stock, Direction::Top, 1)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(by_stock, vec![3]);
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let items = shelf();
        let query = ItemQuery {
            search: "BA".to_string(),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_and_sort(&items, &query).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_by_barcode_substring() {
        let items = shelf();
        // item 3 has barcode "333"
        let query = ItemQuery {
            search: "33".to_string(),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_and_sort(&items, &query).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_filter_by_category_and_sort() {
        let items = shelf();
        let query = ItemQuery {
            search: String::new(),
            category: "Sports".to_string(),
            sort: SortKey::Stock,
        };
        let ids: Vec<i64> = filter_and_sort(&items, &query).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let by_name = ItemQuery {
            sort: SortKey::Name,
            ..Default::default()
        };
        let names: Vec<&str> = filter_and_sort(&items, &by_name)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        // byte order: uppercase before lowercase
        assert_eq!(names, vec!["Apple", "Ball", "Widget", "bat"]);
    }

    #[test]
    fn test_categories() {
        assert_eq!(categories(&shelf()), vec!["Food", "Sports"]);
    }
}
