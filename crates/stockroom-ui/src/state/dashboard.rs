//! # Dashboard State
//!
//! The item table, its filters, the edit dialog and the toast, held in one
//! value that only changes through [`DashboardState::apply`].
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Unidirectional Flow                                  │
//! │                                                                         │
//! │   user input / HTTP result                                             │
//! │            │                                                            │
//! │            ▼                                                            │
//! │        Action ──────► DashboardState::apply(action)                    │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                        DashboardState                                   │
//! │                                │                                        │
//! │              ┌─────────────────┼──────────────────┐                    │
//! │              ▼                 ▼                  ▼                    │
//! │      visible_items()       report()         notification()             │
//! │       (table rows)      (report screen)       (toast)                  │
//! │                                                                         │
//! │  HTTP calls happen outside; their outcome comes back as an Action.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_core::aggregation::{self, CategorySummary, Direction, ItemQuery, RankBy, SortKey, Totals};
use stockroom_core::validation::parse_item_patch;
use stockroom_core::{Item, ItemPatch, ValidationErrors, DEFAULT_RANK_LIMIT, LOW_STOCK_THRESHOLD};
use tracing::{debug, warn};

/// How long a toast stays visible.
pub const NOTIFICATION_TTL_SECS: i64 = 3;

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// A transient toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Notification {
            kind,
            message: message.into(),
            expires_at: Utc::now() + Duration::seconds(NOTIFICATION_TTL_SECS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// =============================================================================
// Edit Dialog
// =============================================================================

/// Fields the edit dialog exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    Name,
    Stock,
}

/// The open edit dialog. Inputs are kept as typed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditForm {
    pub id: i64,
    pub name: String,
    pub stock: String,
}

impl EditForm {
    fn for_item(item: &Item) -> Self {
        EditForm {
            id: item.id,
            name: item.name.clone(),
            stock: item.stock.to_string(),
        }
    }

    /// Validates the inputs into a patch for `PUT /items/{id}`.
    pub fn to_patch(&self) -> Result<ItemPatch, ValidationErrors> {
        let body = json!({
            "name": self.name,
            "stock": self.stock,
        });
        parse_item_patch(&body)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Everything that can change the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `GET /items` returned.
    ItemsLoaded(Vec<Item>),
    SearchChanged(String),
    CategoryChanged(String),
    SortChanged(SortKey),
    EditStarted(i64),
    FieldEdited { field: EditField, value: String },
    EditCancelled,
    /// `PUT` or `POST` returned the stored item.
    ItemSaved(Item),
    /// `DELETE` succeeded.
    ItemDeleted(i64),
    /// Any request failed; the message is shown as a toast.
    RequestFailed(String),
    /// Clock tick; drops an expired toast.
    Tick(DateTime<Utc>),
}

// =============================================================================
// State
// =============================================================================

/// Figures for the reports screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<'a> {
    pub totals: Totals,
    pub low_stock: Vec<&'a Item>,
    pub by_category: BTreeMap<String, CategorySummary>,
    pub top: Vec<&'a Item>,
    pub bottom: Vec<&'a Item>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    items: Vec<Item>,
    query: ItemQuery,
    editing: Option<EditForm>,
    notification: Option<Notification>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only way to change dashboard state.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ItemsLoaded(items) => {
                debug!(count = items.len(), "Items loaded");
                self.items = items;
                let still_present = self
                    .editing
                    .as_ref()
                    .is_some_and(|f| self.items.iter().any(|i| i.id == f.id));
                if !still_present {
                    self.editing = None;
                }
            }
            Action::SearchChanged(search) => self.query.search = search,
            Action::CategoryChanged(category) => self.query.category = category,
            Action::SortChanged(sort) => self.query.sort = sort,
            Action::EditStarted(id) => {
                self.editing = self.items.iter().find(|i| i.id == id).map(EditForm::for_item);
            }
            Action::FieldEdited { field, value } => {
                if let Some(form) = &mut self.editing {
                    match field {
                        EditField::Name => form.name = value,
                        EditField::Stock => form.stock = value,
                    }
                }
            }
            Action::EditCancelled => {
                if self.editing.take().is_some() {
                    self.notify(NotificationKind::Info, "Edit cancelled");
                }
            }
            Action::ItemSaved(item) => {
                if self.editing.as_ref().is_some_and(|f| f.id == item.id) {
                    self.editing = None;
                }
                match self.items.iter_mut().find(|i| i.id == item.id) {
                    Some(existing) => {
                        *existing = item;
                        self.notify(NotificationKind::Success, "Item updated");
                    }
                    None => {
                        self.items.push(item);
                        self.notify(NotificationKind::Success, "Item added");
                    }
                }
            }
            Action::ItemDeleted(id) => {
                self.items.retain(|i| i.id != id);
                if self.editing.as_ref().is_some_and(|f| f.id == id) {
                    self.editing = None;
                }
                self.notify(NotificationKind::Info, "Item deleted");
            }
            Action::RequestFailed(message) => {
                warn!(error = %message, "Request failed");
                self.notify(NotificationKind::Error, message);
            }
            Action::Tick(now) => {
                if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
                    self.notification = None;
                }
            }
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification::new(kind, message));
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn query(&self) -> &ItemQuery {
        &self.query
    }

    pub fn editing(&self) -> Option<&EditForm> {
        self.editing.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Rows of the item table after search, category filter and sort.
    pub fn visible_items(&self) -> Vec<&Item> {
        aggregation::filter_and_sort(&self.items, &self.query)
    }

    /// Whether the table highlights `item` as low on stock.
    pub fn is_low_stock(&self, item: &Item) -> bool {
        item.is_low_stock(LOW_STOCK_THRESHOLD)
    }

    /// Options for the category dropdown, `"All"` first.
    pub fn category_options(&self) -> Vec<String> {
        let mut options = vec![stockroom_core::ALL_CATEGORIES.to_string()];
        options.extend(aggregation::categories(&self.items));
        options
    }

    /// Report screen figures over every loaded item.
    pub fn report(&self, rank_by: RankBy) -> Report<'_> {
        Report {
            totals: aggregation::totals(&self.items),
            low_stock: aggregation::low_stock(&self.items, LOW_STOCK_THRESHOLD),
            by_category: aggregation::group_by_category(&self.items),
            top: aggregation::rank(&self.items, rank_by, Direction::Top, DEFAULT_RANK_LIMIT),
            bottom: aggregation::rank(&self.items, rank_by, Direction::Bottom, DEFAULT_RANK_LIMIT),
        }
    }

    /// Body for saving the open edit dialog.
    ///
    /// `None` when no dialog is open.
    pub fn edit_submission(&self) -> Option<Result<(i64, ItemPatch), ValidationErrors>> {
        self.editing
            .as_ref()
            .map(|form| form.to_patch().map(|patch| (form.id, patch)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Money;

    fn item(id: i64, name: &str, category: &str, stock: i64) -> Item {
        Item {
            id,
            name: name.to_string(),
            category: Some(category.to_string()),
            stock,
            costprice: Money::from_major_minor(10, 0),
            sellingprice: Money::from_major_minor(15, 0),
            barcode: format!("B{}", id),
            format: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn loaded() -> DashboardState {
        let mut state = DashboardState::new();
        state.apply(Action::ItemsLoaded(vec![
            item(1, "Ball", "Sports", 3),
            item(2, "Bat", "Sports", 12),
            item(3, "Apple", "Food", 40),
        ]));
        state
    }

    #[test]
    fn test_filters_drive_visible_items() {
        let mut state = loaded();
        assert_eq!(state.visible_items().len(), 3);

        state.apply(Action::SearchChanged("ba".to_string()));
        let names: Vec<&str> = state.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Ball", "Bat"]);

        state.apply(Action::SortChanged(SortKey::Stock));
        let names: Vec<&str> = state.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bat", "Ball"]);

        state.apply(Action::SearchChanged(String::new()));
        state.apply(Action::CategoryChanged("Food".to_string()));
        assert_eq!(state.visible_items().len(), 1);
    }

    #[test]
    fn test_edit_save_flow() {
        let mut state = loaded();

        state.apply(Action::EditStarted(1));
        assert_eq!(state.editing().unwrap().stock, "3");

        state.apply(Action::FieldEdited {
            field: EditField::Stock,
            value: "10".to_string(),
        });
        let (id, patch) = state.edit_submission().unwrap().unwrap();
        assert_eq!(id, 1);
        assert_eq!(patch.stock, Some(10));

        let mut saved = state.items()[0].clone();
        saved.stock = 10;
        state.apply(Action::ItemSaved(saved));

        assert!(state.editing().is_none());
        assert_eq!(state.items()[0].stock, 10);
        assert_eq!(state.notification().unwrap().message, "Item updated");
        assert!(state.report(RankBy::Revenue).low_stock.is_empty());
    }

    #[test]
    fn test_invalid_edit_is_rejected_locally() {
        let mut state = loaded();
        state.apply(Action::EditStarted(2));
        state.apply(Action::FieldEdited {
            field: EditField::Stock,
            value: "lots".to_string(),
        });

        let errors = state.edit_submission().unwrap().unwrap_err();
        assert_eq!(errors.fields(), vec!["stock"]);
    }

    #[test]
    fn test_cancel_and_delete_notify() {
        let mut state = loaded();

        state.apply(Action::EditStarted(2));
        state.apply(Action::EditCancelled);
        assert!(state.editing().is_none());
        assert_eq!(state.notification().unwrap().message, "Edit cancelled");

        state.apply(Action::ItemDeleted(2));
        assert_eq!(state.items().len(), 2);
        assert_eq!(state.notification().unwrap().kind, NotificationKind::Info);
    }

    #[test]
    fn test_notification_expires_after_ttl() {
        let mut state = loaded();
        state.apply(Action::RequestFailed("Failed to fetch items".to_string()));

        let shown = state.notification().unwrap().clone();
        assert_eq!(shown.kind, NotificationKind::Error);

        state.apply(Action::Tick(shown.expires_at - Duration::seconds(1)));
        assert!(state.notification().is_some());

        state.apply(Action::Tick(shown.expires_at));
        assert!(state.notification().is_none());
    }

    #[test]
    fn test_report_uses_shared_threshold() {
        let state = loaded();
        let report = state.report(RankBy::Revenue);

        assert_eq!(report.totals.count, 3);
        assert_eq!(report.low_stock.len(), 1);
        assert!(state.is_low_stock(report.low_stock[0]));
        assert_eq!(report.by_category.len(), 2);
        assert_eq!(report.top[0].id, 3);
        assert_eq!(report.bottom[0].id, 1);
        assert_eq!(state.category_options(), vec!["All", "Food", "Sports"]);
    }

    #[test]
    fn test_reload_closes_edit_for_vanished_item() {
        let mut state = loaded();
        state.apply(Action::EditStarted(3));
        state.apply(Action::ItemsLoaded(vec![item(1, "Ball", "Sports", 3)]));
        assert!(state.editing().is_none());
    }
}
