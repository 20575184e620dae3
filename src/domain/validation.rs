//! Request validators
//!
//! Pure checks on client input. Anything that needs the store (uniqueness,
//! existence, deletion guards) lives next to the repositories instead.

use std::collections::HashSet;

use serde_json::Value;

use super::{DomainError, NewOrderLine, RawOrderLine};

/// A required text field: present and not blank
pub fn required_text(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::BadRequest(format!(
            "Missing required field: {}",
            field
        ))),
    }
}

/// A required value of any type
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::BadRequest(format!("Missing required field: {}", field)))
}

/// Replacement for a required text field in a partial update.
/// Absent stays absent; a supplied value must not be blank.
pub fn text_change(field: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(DomainError::BadRequest(format!(
            "Field {} must not be empty",
            field
        ))),
        Some(v) => Ok(Some(v)),
    }
}

/// Minimal `local@domain` shape check
pub fn email(value: &str) -> Result<(), DomainError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::BadRequest(format!(
            "Invalid email address: {}",
            value
        )))
    }
}

pub fn price(value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DomainError::BadRequest(
            "Price must be a non-negative number".to_string(),
        ))
    }
}

/// Quantity must be a JSON integer greater than zero.
/// Strings, floats and booleans are rejected even if they look numeric.
pub fn quantity(shop_item_id: i32, raw: &Value) -> Result<i32, DomainError> {
    raw.as_i64()
        .filter(|q| *q > 0)
        .and_then(|q| i32::try_from(q).ok())
        .ok_or_else(|| {
            DomainError::BadRequest(format!(
                "Invalid quantity for item {}. Must be a positive integer.",
                shop_item_id
            ))
        })
}

pub fn order_line(raw: RawOrderLine) -> Result<NewOrderLine, DomainError> {
    let (shop_item_id, raw_quantity) = match (raw.shop_item_id, raw.quantity) {
        (Some(id), Some(q)) if !q.is_null() => (id, q),
        _ => {
            return Err(DomainError::BadRequest(
                "Each item must have shop_item_id and quantity".to_string(),
            ));
        }
    };

    Ok(NewOrderLine {
        shop_item_id,
        quantity: quantity(shop_item_id, &raw_quantity)?,
    })
}

/// Validate every line; the first offending line decides the error
pub fn order_lines(raw: Vec<RawOrderLine>) -> Result<Vec<NewOrderLine>, DomainError> {
    raw.into_iter().map(order_line).collect()
}

/// Presence checks of a create-order request: a customer and a non-empty
/// line list. Lines are checked separately, once the customer is known to exist.
pub fn order_request(
    customer_id: Option<i32>,
    items: Option<Vec<RawOrderLine>>,
) -> Result<(i32, Vec<RawOrderLine>), DomainError> {
    let (customer_id, items) = match (customer_id, items) {
        (Some(c), Some(i)) => (c, i),
        _ => {
            return Err(DomainError::BadRequest(
                "Missing customer_id or items".to_string(),
            ));
        }
    };

    if items.is_empty() {
        return Err(DomainError::BadRequest(
            "Order must contain at least one item".to_string(),
        ));
    }

    Ok((customer_id, items))
}

/// Remove duplicate ids, keeping first-seen order
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Requested ids that are not in `found`, deduplicated, in request order
pub fn unresolved_ids(requested: &[i32], found: &HashSet<i32>) -> Vec<i32> {
    dedup_ids(requested)
        .into_iter()
        .filter(|id| !found.contains(id))
        .collect()
}
