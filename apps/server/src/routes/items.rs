//! # Item Handlers
//!
//! CRUD over `/items`. Bodies are taken as raw JSON and checked by
//! `stockroom_core::validation` so every missing or malformed field is
//! reported in one 400.
//!
//! ```text
//! create:  body ──► parse_new_item ──► insert ──────► 200 Item
//! update:  body ──► parse_item_patch ─► update ─────► 200 Item | 404
//! delete:  id ────────────────────────► delete ─────► 200 {message, id} | 404
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use stockroom_core::validation::{parse_item_patch, parse_new_item};
use stockroom_core::{Deleted, Item};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// A path id that is not an integer names no item.
fn item_id(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    id.map(|Path(id)| id).map_err(|_| ApiError::item_not_found())
}

/// `GET /items`
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    let items = state.db.items().list().await?;
    debug!(count = items.len(), "Listed items");
    Ok(Json(items))
}

/// `GET /items/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Item>> {
    let id = item_id(id)?;
    let item = state
        .db
        .items()
        .get_by_id(id)
        .await?
        .ok_or_else(ApiError::item_not_found)?;
    Ok(Json(item))
}

/// `POST /items`
pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let Json(body) = body?;
    let new_item = parse_new_item(&body)?;

    let item = state.db.items().insert(&new_item).await?;
    info!(id = item.id, barcode = %item.barcode, "Item created");
    Ok(Json(item))
}

/// `PUT /items/{id}`
pub async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let id = item_id(id)?;
    let Json(body) = body?;
    let patch = parse_item_patch(&body)?;

    let item = state.db.items().update(id, &patch).await?;
    info!(id, "Item updated");
    Ok(Json(item))
}

/// `DELETE /items/{id}`
pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Deleted>> {
    let id = item_id(id)?;
    state.db.items().delete(id).await?;
    info!(id, "Item deleted");
    Ok(Json(Deleted::new(id)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use stockroom_core::aggregation::{group_by_category, low_stock};
    use stockroom_core::{Money, LOW_STOCK_THRESHOLD};
    use stockroom_db::{Database, DbConfig};

    async fn state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db)
    }

    fn ball() -> Value {
        json!({
            "name": "Ball",
            "category": "Sports",
            "stock": 3,
            "costprice": 10,
            "sellingprice": 15,
            "barcode": "123"
        })
    }

    async fn create(state: &AppState, body: Value) -> ApiResult<Item> {
        create_item(State(state.clone()), Ok(Json(body)))
            .await
            .map(|Json(item)| item)
    }

    #[tokio::test]
    async fn test_create_assigns_first_id() {
        let state = state().await;
        let item = create(&state, ball()).await.unwrap();

        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Ball");
        assert_eq!(item.costprice, Money::parse_decimal("10").unwrap());

        let items = [item];
        assert_eq!(low_stock(&items, LOW_STOCK_THRESHOLD).len(), 1);

        let groups = group_by_category(&items);
        let sports = &groups["Sports"];
        assert_eq!(sports.cost, Money::parse_decimal("30").unwrap());
        assert_eq!(sports.revenue, Money::parse_decimal("45").unwrap());
        assert_eq!(sports.profit, Money::parse_decimal("15").unwrap());
    }

    #[tokio::test]
    async fn test_create_lists_missing_fields() {
        let state = state().await;
        let err = create(&state, json!({ "name": "Ball", "stock": "lots" }))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("category"));
        assert!(err.message.contains("stock"));
        assert!(err.message.contains("barcode"));

        let Json(items) = list_items(State(state)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_numbers() {
        let state = state().await;
        let mut body = ball();
        body["costprice"] = json!(100_000_000_000_000_000i64);
        body["stock"] = json!(i64::MAX);

        let err = create(&state, body).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("costprice must be at most 10000000.00"));
        assert!(err.message.contains("stock must be at most 1000000"));
    }

    #[tokio::test]
    async fn test_list_after_creates() {
        let state = state().await;
        create(&state, ball()).await.unwrap();
        let mut widget = ball();
        widget["name"] = json!("Widget");
        widget["barcode"] = json!("456");
        create(&state, widget).await.unwrap();

        let Json(items) = list_items(State(state)).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Ball", "Widget"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let state = state().await;
        let created = create(&state, ball()).await.unwrap();

        let Json(updated) = update_item(
            State(state.clone()),
            Ok(Path(created.id)),
            Ok(Json(json!({ "stock": 10 }))),
        )
        .await
        .unwrap();

        assert_eq!(updated.stock, 10);
        assert_eq!(updated.name, "Ball");
        assert_eq!(updated.barcode, "123");

        let Json(fetched) = get_item(State(state), Ok(Path(created.id))).await.unwrap();
        assert_eq!(fetched.stock, 10);
    }

    #[tokio::test]
    async fn test_empty_update_is_unchanged() {
        let state = state().await;
        let created = create(&state, ball()).await.unwrap();

        let Json(updated) = update_item(
            State(state),
            Ok(Path(created.id)),
            Ok(Json(json!({}))),
        )
        .await
        .unwrap();

        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let state = state().await;
        let err = update_item(State(state.clone()), Ok(Path(42)), Ok(Json(json!({ "stock": 1 }))))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Item not found");

        let Json(items) = list_items(State(state)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_stock() {
        let state = state().await;
        let created = create(&state, ball()).await.unwrap();

        let err = update_item(
            State(state),
            Ok(Path(created.id)),
            Ok(Json(json!({ "stock": "ten" }))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let state = state().await;
        let created = create(&state, ball()).await.unwrap();

        let Json(deleted) = delete_item(State(state.clone()), Ok(Path(created.id)))
            .await
            .unwrap();
        assert_eq!(deleted, Deleted::new(created.id));
        assert_eq!(deleted.message, "Item deleted successfully");

        let err = delete_item(State(state.clone()), Ok(Path(created.id)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = get_item(State(state), Ok(Path(created.id))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
