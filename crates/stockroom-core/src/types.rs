//! # Domain Types
//!
//! The inventory record and the two payload shapes that create and edit it.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    NewItem      │   │      Item       │   │   ItemPatch     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │──►│  id (store)     │◄──│  name?          │       │
//! │  │  category       │   │  name           │   │  category?      │       │
//! │  │  stock          │   │  category       │   │  stock?         │       │
//! │  │  costprice      │   │  stock          │   │  costprice?     │       │
//! │  │  sellingprice   │   │  costprice      │   │  sellingprice?  │       │
//! │  │  barcode        │   │  sellingprice   │   │  barcode?       │       │
//! │  │  format?        │   │  barcode        │   │  format?        │       │
//! │  └─────────────────┘   │  format?        │   └─────────────────┘       │
//! │        create          │  created_at     │      partial update         │
//! │                        │  updated_at     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is an integer assigned by the store on insert and never reused.
//! `barcode` is the business key used by scan-matching; it is expected to be
//! unique in practice but nothing enforces it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::MISC_CATEGORY;

// =============================================================================
// Item
// =============================================================================

/// One inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    /// Store-assigned identifier.
    pub id: i64,

    /// Display name, never blank.
    pub name: String,

    /// Category label. Rows created before categories existed have none.
    pub category: Option<String>,

    /// Units on hand, never negative.
    pub stock: i64,

    /// Unit cost.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "costprice_cents"))]
    #[ts(type = "number")]
    pub costprice: Money,

    /// Unit selling price.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "sellingprice_cents"))]
    #[ts(type = "number")]
    pub sellingprice: Money,

    /// Scanned barcode text.
    pub barcode: String,

    /// Barcode symbology reported by the decoder (e.g. `EAN_13`).
    pub format: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Category used for grouping; blank or missing becomes `"Misc"`.
    pub fn category_or_misc(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => MISC_CATEGORY,
        }
    }

    /// `costprice × stock`.
    #[inline]
    pub fn cost_value(&self) -> Money {
        self.costprice.multiply_quantity(self.stock)
    }

    /// `sellingprice × stock`.
    #[inline]
    pub fn revenue_value(&self) -> Money {
        self.sellingprice.multiply_quantity(self.stock)
    }

    /// `revenue − cost` for the stock on hand.
    #[inline]
    pub fn profit_value(&self) -> Money {
        self.revenue_value() - self.cost_value()
    }

    /// True when stock is at or below `threshold`.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock <= threshold
    }
}

// =============================================================================
// New Item
// =============================================================================

/// A validated create payload.
///
/// Built by [`crate::validation::parse_new_item`] on the server and by the
/// scanner form on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub stock: i64,
    #[ts(type = "number")]
    pub costprice: Money,
    #[ts(type = "number")]
    pub sellingprice: Money,
    pub barcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

// =============================================================================
// Item Patch
// =============================================================================

/// A validated partial update. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub costprice: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub sellingprice: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ItemPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == ItemPatch::default()
    }

    /// Patch that only sets the stock level.
    pub fn stock(stock: i64) -> Self {
        ItemPatch {
            stock: Some(stock),
            ..Default::default()
        }
    }
}

// =============================================================================
// Delete Confirmation
// =============================================================================

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Deleted {
    pub message: String,
    pub id: i64,
}

impl Deleted {
    pub fn new(id: i64) -> Self {
        Deleted {
            message: "Item deleted successfully".to_string(),
            id,
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Health {
    /// `"ok"` or `"unavailable"`.
    pub status: String,
    /// Stored item count; absent when the store is unreachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================
