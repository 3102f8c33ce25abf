//! # stockroom-core: Pure Inventory Logic
//!
//! Domain types and the computations shared by the server and the client.
//! Nothing in here touches a database, a socket or a camera.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stockroom-ui (client state)                     │   │
//! │  │    Dashboard ──► Scanner ──► Reports ──► POS cart ──► CSV       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-server (axum)                         │   │
//! │  │    GET/POST /items, GET/PUT/DELETE /items/{id}, GET /health     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ stockroom-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐    │   │
//! │  │   │  types   │ │  money   │ │ validation │ │ aggregation  │    │   │
//! │  │   │  Item    │ │  Money   │ │ parse_*    │ │ totals, rank │    │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └──────────────┘    │   │
//! │  │                       ┌──────────┐                              │   │
//! │  │                       │   scan   │                              │   │
//! │  │                       └──────────┘                              │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (SQLite)                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Item`, `NewItem`, `ItemPatch`
//! - [`money`] - Integer minor-unit prices
//! - [`error`] - Validation error types
//! - [`validation`] - JSON payload checks for create and update
//! - [`aggregation`] - Report figures over a loaded item list
//! - [`scan`] - Barcode lookup against a loaded item list
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{aggregation, Money};
//!
//! let price = Money::parse_decimal("15").unwrap();
//! assert_eq!(price.multiply_quantity(3), Money::from_major_minor(45, 0));
//!
//! let totals = aggregation::totals(&[]);
//! assert_eq!(totals.count, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod error;
pub mod money;
pub mod scan;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregation::{CategorySummary, Direction, ItemQuery, RankBy, SortKey, Totals};
pub use error::{MoneyParseError, ValidationError, ValidationErrors};
pub use money::Money;
pub use scan::match_barcode;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Items with `stock <= LOW_STOCK_THRESHOLD` are low on stock.
///
/// The table highlight, the dashboard warning and the report list all read
/// this one value.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Bucket for items without a category.
pub const MISC_CATEGORY: &str = "Misc";

/// Category filter value that disables filtering.
pub const ALL_CATEGORIES: &str = "All";

/// How many items the top/bottom performer lists show.
pub const DEFAULT_RANK_LIMIT: usize = 5;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_BARCODE_LEN: usize = 128;

/// Largest accepted stock count.
///
/// With [`MAX_PRICE`] this keeps `price × stock` and report sums well
/// inside `i64` cents.
pub const MAX_STOCK: i64 = 1_000_000;

/// Largest accepted cost or selling price (10,000,000.00).
pub const MAX_PRICE: Money = Money::from_minor_units(1_000_000_000);
