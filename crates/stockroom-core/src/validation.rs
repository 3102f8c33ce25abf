//! # Validation Module
//!
//! Turns raw JSON payloads into [`NewItem`] / [`ItemPatch`] values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  └── "Please fill all fields" before submit (ScanForm)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler                                                 │
//! │  └── THIS MODULE: every field checked, all failures collected          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (stock >= 0)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Accepted Shapes
//! Number inputs arrive either as JSON numbers (`parseInt`/`parseFloat` on
//! the client) or as their raw text. Both are accepted. On create, `null`
//! and blank strings count as missing. On update, `null` means "leave the
//! field alone".
//!
//! ```rust
//! use serde_json::json;
//! use stockroom_core::validation::parse_new_item;
//!
//! let item = parse_new_item(&json!({
//!     "name": "Ball", "category": "Sports", "stock": "3",
//!     "costprice": 10, "sellingprice": 15.5, "barcode": "123"
//! })).unwrap();
//! assert_eq!(item.stock, 3);
//!
//! let err = parse_new_item(&json!({ "name": "Ball" })).unwrap_err();
//! assert_eq!(err.fields(), vec!["category", "stock", "costprice", "sellingprice", "barcode"]);
//! ```

use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::error::{MoneyParseError, ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::{ItemPatch, NewItem};
use crate::{MAX_BARCODE_LEN, MAX_CATEGORY_LEN, MAX_NAME_LEN, MAX_PRICE, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

// =============================================================================
// Payload Parsers
// =============================================================================

/// Validates a create payload. Every required field must be present.
pub fn parse_new_item(body: &Value) -> ValidationResult<NewItem> {
    let fields = as_object(body)?;
    let mut errors = ValidationErrors::new();

    let name = required(fields, "name", &mut errors, |v| text(v, "name", MAX_NAME_LEN));
    let category = required(fields, "category", &mut errors, |v| {
        text(v, "category", MAX_CATEGORY_LEN)
    });
    let stock = required(fields, "stock", &mut errors, stock);
    let costprice = required(fields, "costprice", &mut errors, |v| price(v, "costprice"));
    let sellingprice = required(fields, "sellingprice", &mut errors, |v| {
        price(v, "sellingprice")
    });
    let barcode = required(fields, "barcode", &mut errors, |v| {
        text(v, "barcode", MAX_BARCODE_LEN)
    });
    let format = optional(fields, "format", &mut errors, |v| {
        text(v, "format", MAX_CATEGORY_LEN)
    });

    match (name, category, stock, costprice, sellingprice, barcode) {
        (Some(name), Some(category), Some(stock), Some(costprice), Some(sellingprice), Some(barcode))
            if errors.is_empty() =>
        {
            Ok(NewItem {
                name,
                category,
                stock,
                costprice,
                sellingprice,
                barcode,
                format,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a partial update payload. Absent and `null` fields are kept.
///
/// Unknown keys (including `id`) are ignored.
pub fn parse_item_patch(body: &Value) -> ValidationResult<ItemPatch> {
    let fields = as_object(body)?;
    let mut errors = ValidationErrors::new();

    let patch = ItemPatch {
        name: optional(fields, "name", &mut errors, |v| text(v, "name", MAX_NAME_LEN)),
        category: optional(fields, "category", &mut errors, |v| {
            text(v, "category", MAX_CATEGORY_LEN)
        }),
        stock: optional(fields, "stock", &mut errors, stock),
        costprice: optional(fields, "costprice", &mut errors, |v| price(v, "costprice")),
        sellingprice: optional(fields, "sellingprice", &mut errors, |v| {
            price(v, "sellingprice")
        }),
        barcode: optional(fields, "barcode", &mut errors, |v| {
            text(v, "barcode", MAX_BARCODE_LEN)
        }),
        format: optional(fields, "format", &mut errors, |v| {
            text(v, "format", MAX_CATEGORY_LEN)
        }),
    };

    errors.into_result(patch)
}

// =============================================================================
// Field Helpers
// =============================================================================

fn as_object(body: &Value) -> ValidationResult<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| ValidationErrors::from(ValidationError::NotAnObject))
}

/// `null` and blank strings are treated as absent.
fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn required<T>(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
    check: impl FnOnce(&Value) -> Result<T, ValidationError>,
) -> Option<T> {
    match present(fields, key) {
        None => {
            errors.push(ValidationError::Required {
                field: key.to_string(),
            });
            None
        }
        Some(v) => collect(check(v), errors),
    }
}

fn optional<T>(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
    check: impl FnOnce(&Value) -> Result<T, ValidationError>,
) -> Option<T> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => collect(check(v), errors),
    }
}

fn collect<T>(result: Result<T, ValidationError>, errors: &mut ValidationErrors) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

// =============================================================================
// Value Validators
// =============================================================================

/// Non-blank text, trimmed, at most `max` characters.
fn text(value: &Value, field: &str, max: usize) -> Result<String, ValidationError> {
    let s = value.as_str().ok_or_else(|| ValidationError::NotText {
        field: field.to_string(),
    })?;
    let s = s.trim();

    if s.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if s.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(s.to_string())
}

/// Whole number in `0..=MAX_STOCK` from a JSON number or numeric string.
fn stock(value: &Value) -> Result<i64, ValidationError> {
    let field = || "stock".to_string();

    let n = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.as_u64().is_some() {
                // beyond i64, caught by the ceiling below
                i64::MAX
            } else {
                match n.as_f64() {
                    // `as` saturates, so out-of-range floats hit the bounds checks
                    Some(f) if f.fract() == 0.0 => f as i64,
                    _ => return Err(ValidationError::NotAnInteger { field: field() }),
                }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => i,
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
                Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
                Err(_) if s.parse::<f64>().is_ok_and(f64::is_finite) => {
                    return Err(ValidationError::NotAnInteger { field: field() })
                }
                Err(_) => return Err(ValidationError::NotANumber { field: field() }),
            }
        }
        _ => return Err(ValidationError::NotANumber { field: field() }),
    };

    if n < 0 {
        return Err(ValidationError::Negative { field: field() });
    }

    if n > MAX_STOCK {
        return Err(ValidationError::TooLarge {
            field: field(),
            max: MAX_STOCK.to_string(),
        });
    }

    Ok(n)
}

/// Decimal amount in `0..=MAX_PRICE` from a JSON number or numeric string.
fn price(value: &Value, field: &str) -> Result<Money, ValidationError> {
    let not_a_number = || ValidationError::NotANumber {
        field: field.to_string(),
    };
    let too_large = || ValidationError::TooLarge {
        field: field.to_string(),
        max: MAX_PRICE.to_string(),
    };

    let money = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Money::checked_from_major(i).ok_or_else(too_large)?
            } else if n.as_u64().is_some() {
                return Err(too_large());
            } else {
                let f = n.as_f64().ok_or_else(not_a_number)?;
                Money::from_f64(f).map_err(|e| money_error(e, not_a_number, too_large))?
            }
        }
        Value::String(s) => {
            Money::parse_decimal(s).map_err(|e| money_error(e, not_a_number, too_large))?
        }
        _ => return Err(not_a_number()),
    };

    if money.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if money > MAX_PRICE {
        return Err(too_large());
    }

    Ok(money)
}

fn money_error(
    err: MoneyParseError,
    not_a_number: impl Fn() -> ValidationError,
    too_large: impl Fn() -> ValidationError,
) -> ValidationError {
    match err {
        MoneyParseError::Overflow => too_large(),
        _ => not_a_number(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
