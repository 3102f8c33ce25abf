//! # Cart State
//!
//! The point-of-sale cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Screen Action            Cart Method             State Change          │
//! │  ─────────────            ───────────             ────────────          │
//! │                                                                         │
//! │  Click Item ─────────────► add_item() ──────────► push or qty + 1      │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ───► qty = max(n, 1)      │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► lines.remove(i)      │
//! │                                                                         │
//! │  Click Checkout ─────────► checkout() ──────────► lines.clear()        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::{Item, Money};

use crate::error::CartError;

/// One line in the cart.
///
/// Name and price are copied when the item is added, so a later edit to the
/// item does not change what is already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartLine {
    pub fn from_item(item: &Item) -> Self {
        CartLine {
            item_id: item.id,
            name: item.name.clone(),
            unit_price: item.sellingprice,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `item_id` (adding the same item increases quantity)
/// - Quantity is always at least 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Adds one unit of `item`, or one more if it is already in the cart.
    pub fn add_item(&mut self, item: &Item) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine::from_item(item));
    }

    /// Sets a line's quantity. Values below 1 become 1.
    pub fn update_quantity(&mut self, item_id: i64, quantity: i64) -> Result<(), CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == item_id)
            .ok_or(CartError::NotInCart(item_id))?;
        line.quantity = quantity.max(1);
        Ok(())
    }

    /// Removes a line by item ID.
    pub fn remove_item(&mut self, item_id: i64) -> Result<(), CartError> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);

        if self.lines.len() == initial_len {
            Err(CartError::NotInCart(item_id))
        } else {
            Ok(())
        }
    }

    /// Σ sellingprice × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).fold(0, i64::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empties the cart and returns what was in it.
    pub fn checkout(&mut self) -> Receipt {
        let receipt = Receipt {
            total: self.total(),
            lines: std::mem::take(&mut self.lines),
            opened_at: self.created_at,
            closed_at: Utc::now(),
        };
        self.created_at = receipt.closed_at;
        receipt
    }
}

/// What a checkout sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
