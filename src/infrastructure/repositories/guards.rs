//! Store-backed checks run before a mutation, inside the same transaction.

use std::collections::HashSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use crate::domain::validation::{dedup_ids, unresolved_ids};
use crate::domain::{DomainError, NewOrderLine};
use crate::models::{category, customer, item, item_categories, order_line};

/// Whether another customer (not `except`) already uses this email
pub(crate) async fn email_taken<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    except: Option<i32>,
) -> Result<bool, DomainError> {
    let mut query = customer::Entity::find().filter(customer::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(customer::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

pub(crate) async fn category_title_taken<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    except: Option<i32>,
) -> Result<bool, DomainError> {
    let mut query = category::Entity::find().filter(category::Column::Title.eq(title));
    if let Some(id) = except {
        query = query.filter(category::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

pub(crate) async fn item_title_taken<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    except: Option<i32>,
) -> Result<bool, DomainError> {
    let mut query = item::Entity::find().filter(item::Column::Title.eq(title));
    if let Some(id) = except {
        query = query.filter(item::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

/// Whether any item is associated with the category
pub(crate) async fn category_in_use<C: ConnectionTrait>(
    conn: &C,
    category_id: i32,
) -> Result<bool, DomainError> {
    let links = item_categories::Entity::find()
        .filter(item_categories::Column::CategoryId.eq(category_id))
        .count(conn)
        .await?;
    Ok(links > 0)
}

/// Whether any order line references the item
pub(crate) async fn item_in_use<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
) -> Result<bool, DomainError> {
    let lines = order_line::Entity::find()
        .filter(order_line::Column::ShopItemId.eq(item_id))
        .count(conn)
        .await?;
    Ok(lines > 0)
}

pub(crate) async fn require_customer<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
) -> Result<customer::Model, DomainError> {
    customer::Entity::find_by_id(customer_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Customer"))
}

/// Resolve a requested category set. Fails with `NotFound` naming exactly the
/// ids that do not exist; on success returns the deduplicated ids.
pub(crate) async fn resolve_categories<C: ConnectionTrait>(
    conn: &C,
    requested: &[i32],
) -> Result<Vec<i32>, DomainError> {
    let ids = dedup_ids(requested);
    if ids.is_empty() {
        return Ok(ids);
    }

    let found: HashSet<i32> = category::Entity::find()
        .select_only()
        .column(category::Column::Id)
        .filter(category::Column::Id.is_in(ids.clone()))
        .into_tuple::<i32>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    let missing = unresolved_ids(&ids, &found);
    if !missing.is_empty() {
        return Err(DomainError::NotFound(format!(
            "One or more categories not found: {:?}",
            missing
        )));
    }

    Ok(ids)
}

/// Every line must reference an existing item; the first missing one is reported
pub(crate) async fn require_items<C: ConnectionTrait>(
    conn: &C,
    lines: &[NewOrderLine],
) -> Result<(), DomainError> {
    let requested: Vec<i32> = lines.iter().map(|l| l.shop_item_id).collect();
    if requested.is_empty() {
        return Ok(());
    }

    let found: HashSet<i32> = item::Entity::find()
        .select_only()
        .column(item::Column::Id)
        .filter(item::Column::Id.is_in(dedup_ids(&requested)))
        .into_tuple::<i32>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    match unresolved_ids(&requested, &found).first() {
        Some(missing) => Err(DomainError::NotFound(format!(
            "ShopItem with id {} not found",
            missing
        ))),
        None => Ok(()),
    }
}
