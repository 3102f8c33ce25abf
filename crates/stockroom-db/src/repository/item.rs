//! # Item Repository
//!
//! Database operations for inventory items.
//!
//! ## Key Operations
//! - List / get / barcode lookup
//! - Insert returning the stored row
//! - Partial update as one statement
//! - Hard delete
//!
//! ## Partial Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How update() Merges Fields                           │
//! │                                                                         │
//! │  PUT /items/1  {"stock": 10}                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ItemPatch { stock: Some(10), everything else: None }                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE items SET                                                      │
//! │      name  = COALESCE(NULL, name),      ← kept                         │
//! │      stock = COALESCE(10,   stock),     ← replaced                     │
//! │      ...                                                                │
//! │  WHERE id = 1                                                          │
//! │  RETURNING *                                                           │
//! │       │                                                                 │
//! │       ├── row returned ──► merged Item                                 │
//! │       └── no row ────────► DbError::NotFound (nothing written)         │
//! │                                                                         │
//! │  Existence check, merge and write happen in a single statement, so two │
//! │  concurrent edits can't interleave between a read and a write.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{Item, ItemPatch, NewItem};

const ITEM_COLUMNS: &str = "id, name, category, stock, costprice_cents, sellingprice_cents, \
                            barcode, format, created_at, updated_at";

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let all = repo.list().await?;
/// let item = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Every item, in insertion (`id`) order.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let sql = format!("SELECT {} FROM items ORDER BY id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, Item>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let sql = format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS);
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets the lowest-id item carrying `barcode`.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Item>> {
        debug!(barcode = %barcode, "Looking up barcode");

        let sql = format!(
            "SELECT {} FROM items WHERE barcode = ?1 ORDER BY id LIMIT 1",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts a new item and returns it with its assigned id.
    pub async fn insert(&self, new: &NewItem) -> DbResult<Item> {
        debug!(barcode = %new.barcode, name = %new.name, "Inserting item");

        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO items (
                name, category, stock, costprice_cents, sellingprice_cents,
                barcode, format, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(&new.name)
            .bind(&new.category)
            .bind(new.stock)
            .bind(new.costprice)
            .bind(new.sellingprice)
            .bind(&new.barcode)
            .bind(&new.format)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        debug!(id = item.id, "Item inserted");
        Ok(item)
    }

    /// Applies `patch` to item `id` and returns the merged row.
    ///
    /// Fields left as `None` keep their stored value. An empty patch
    /// returns the row untouched, `updated_at` included.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no item with this id; nothing was written
    pub async fn update(&self, id: i64, patch: &ItemPatch) -> DbResult<Item> {
        debug!(id = id, "Updating item");

        if patch.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Item", id));
        }

        let now = Utc::now();
        let sql = format!(
            r#"
            UPDATE items
            SET
                name               = COALESCE(?2, name),
                category           = COALESCE(?3, category),
                stock              = COALESCE(?4, stock),
                costprice_cents    = COALESCE(?5, costprice_cents),
                sellingprice_cents = COALESCE(?6, sellingprice_cents),
                barcode            = COALESCE(?7, barcode),
                format             = COALESCE(?8, format),
                updated_at         = ?9
            WHERE id = ?1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.category)
            .bind(patch.stock)
            .bind(patch.costprice)
            .bind(patch.sellingprice)
            .bind(&patch.barcode)
            .bind(&patch.format)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        item.ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Deletes item `id` permanently.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no item with this id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Number of stored items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
