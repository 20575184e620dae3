//! Explicit loaders turning table rows into response aggregates.
//!
//! Relationships are resolved with one batched query per level instead of
//! lazy per-row lookups; the resulting DTOs carry no back-references.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{Category, Customer, DomainError, Item, Order, OrderLine};
use crate::models::{category, customer, item, item_categories, order, order_line};

impl From<customer::Model> for Customer {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            surname: model.surname,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn item_from_parts(model: item::Model, mut categories: Vec<Category>) -> Item {
    categories.sort_by_key(|c| c.id);
    Item {
        id: model.id,
        title: model.title,
        description: model.description,
        price: model.price,
        category_ids: categories.iter().map(|c| c.id).collect(),
        categories,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Resolve the categories of each item
pub(crate) async fn items_with_categories<C>(
    conn: &C,
    items: Vec<item::Model>,
) -> Result<Vec<Item>, DomainError>
where
    C: ConnectionTrait,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let item_ids: Vec<i32> = items.iter().map(|i| i.id).collect();
    let links = item_categories::Entity::find()
        .filter(item_categories::Column::ItemId.is_in(item_ids))
        .all(conn)
        .await?;

    let category_ids: BTreeSet<i32> = links.iter().map(|l| l.category_id).collect();
    let categories: HashMap<i32, Category> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|c| (c.id, Category::from(c)))
            .collect()
    };

    let mut by_item: HashMap<i32, Vec<Category>> = HashMap::new();
    for link in links {
        if let Some(category) = categories.get(&link.category_id) {
            by_item
                .entry(link.item_id)
                .or_default()
                .push(category.clone());
        }
    }

    Ok(items
        .into_iter()
        .map(|model| {
            let categories = by_item.remove(&model.id).unwrap_or_default();
            item_from_parts(model, categories)
        })
        .collect())
}

pub(crate) async fn item_with_categories<C>(
    conn: &C,
    model: item::Model,
) -> Result<Item, DomainError>
where
    C: ConnectionTrait,
{
    let id = model.id;
    items_with_categories(conn, vec![model])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::Internal(format!("Item {} vanished while loading", id)))
}

/// Resolve customer, lines and each line's item for every order
pub(crate) async fn orders_with_details<C>(
    conn: &C,
    orders: Vec<order::Model>,
) -> Result<Vec<Order>, DomainError>
where
    C: ConnectionTrait,
{
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let customer_ids: BTreeSet<i32> = orders.iter().map(|o| o.customer_id).collect();
    let customers: HashMap<i32, Customer> = customer::Entity::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, Customer::from(c)))
        .collect();

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let lines = order_line::Entity::find()
        .filter(order_line::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_line::Column::Id)
        .all(conn)
        .await?;

    let item_ids: BTreeSet<i32> = lines.iter().map(|l| l.shop_item_id).collect();
    let items: HashMap<i32, Item> = if item_ids.is_empty() {
        HashMap::new()
    } else {
        let models = item::Entity::find()
            .filter(item::Column::Id.is_in(item_ids))
            .all(conn)
            .await?;
        items_with_categories(conn, models)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect()
    };

    let mut lines_by_order: HashMap<i32, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        lines_by_order
            .entry(line.order_id)
            .or_default()
            .push(OrderLine {
                id: line.id,
                order_id: line.order_id,
                shop_item_id: line.shop_item_id,
                quantity: line.quantity,
                shop_item: items.get(&line.shop_item_id).cloned(),
            });
    }

    Ok(orders
        .into_iter()
        .map(|model| Order {
            id: model.id,
            customer_id: model.customer_id,
            customer: customers.get(&model.customer_id).cloned(),
            items: lines_by_order.remove(&model.id).unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
        .collect())
}

pub(crate) async fn order_with_details<C>(
    conn: &C,
    model: order::Model,
) -> Result<Order, DomainError>
where
    C: ConnectionTrait,
{
    let id = model.id;
    orders_with_details(conn, vec![model])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::Internal(format!("Order {} vanished while loading", id)))
}
