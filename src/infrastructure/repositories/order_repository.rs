//! SeaORM implementation of OrderRepository
//!
//! Every write runs in one transaction. Validation failures return before
//! commit, so the dropped transaction rolls back and no partial order or
//! half-replaced line set is ever visible.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{aggregates, guards};
use crate::domain::{
    DomainError, NewOrder, NewOrderLine, Order, OrderChanges, OrderFilter, OrderRepository,
};
use crate::models::order::{self, ActiveModel, Entity as OrderEntity};
use crate::models::order_line;

/// SeaORM-based implementation of OrderRepository
pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    order_id: i32,
    lines: &[NewOrderLine],
) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Ok(());
    }

    let rows = lines.iter().map(|line| order_line::ActiveModel {
        order_id: Set(order_id),
        shop_item_id: Set(line.shop_item_id),
        quantity: Set(line.quantity),
        ..Default::default()
    });
    order_line::Entity::insert_many(rows).exec(txn).await?;

    Ok(())
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn find_all(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        let mut query = OrderEntity::find().order_by_asc(order::Column::Id);

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(order::Column::CustomerId.eq(customer_id));
        }

        let orders = query.all(&self.db).await?;
        aggregates::orders_with_details(&self.db, orders).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        match OrderEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(aggregates::order_with_details(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, input: NewOrder) -> Result<Order, DomainError> {
        if input.lines.is_empty() {
            return Err(DomainError::BadRequest(
                "Order must contain at least one item".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        guards::require_customer(&txn, input.customer_id).await?;
        guards::require_items(&txn, &input.lines).await?;

        let now = chrono::Utc::now().to_rfc3339();
        let order = ActiveModel {
            customer_id: Set(input.customer_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = order.insert(&txn).await?;
        insert_lines(&txn, result.id, &input.lines).await?;
        txn.commit().await?;

        tracing::info!(
            order_id = result.id,
            customer_id = result.customer_id,
            lines = input.lines.len(),
            "Order created"
        );
        aggregates::order_with_details(&self.db, result).await
    }

    async fn update(&self, id: i32, changes: OrderChanges) -> Result<Order, DomainError> {
        let txn = self.db.begin().await?;

        let existing = OrderEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Order"))?;

        if let Some(customer_id) = changes.customer_id {
            guards::require_customer(&txn, customer_id)
                .await
                .map_err(|e| match e {
                    DomainError::NotFound(_) => {
                        DomainError::NotFound("New customer not found".to_string())
                    }
                    other => other,
                })?;
        }

        // Validate the whole replacement set before touching the current lines
        if let Some(lines) = &changes.lines {
            guards::require_items(&txn, lines).await?;

            order_line::Entity::delete_many()
                .filter(order_line::Column::OrderId.eq(id))
                .exec(&txn)
                .await?;
            insert_lines(&txn, id, lines).await?;
        }

        let mut active: ActiveModel = existing.into();
        if let Some(customer_id) = changes.customer_id {
            active.customer_id = Set(customer_id);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            order_id = id,
            lines_replaced = changes.lines.is_some(),
            "Order updated"
        );
        aggregates::order_with_details(&self.db, model).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if OrderEntity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("Order"));
        }

        order_line::Entity::delete_many()
            .filter(order_line::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        OrderEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::domain::{CustomerRepository, ItemRepository, NewCustomer, NewItem};
    use crate::infrastructure::{SeaOrmCustomerRepository, SeaOrmItemRepository};
    use sea_orm::PaginatorTrait;

    struct Fixture {
        db: DatabaseConnection,
        orders: SeaOrmOrderRepository,
        customer_ids: Vec<i32>,
        item_ids: Vec<i32>,
    }

    async fn fixture() -> Fixture {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let customers = SeaOrmCustomerRepository::new(db.clone());
        let items = SeaOrmItemRepository::new(db.clone());

        let mut customer_ids = Vec::new();
        for (name, email) in [("John", "john@example.com"), ("Jane", "jane@example.com")] {
            let customer = customers
                .create(NewCustomer {
                    name: name.to_string(),
                    surname: "Doe".to_string(),
                    email: email.to_string(),
                })
                .await
                .unwrap();
            customer_ids.push(customer.id);
        }

        let mut item_ids = Vec::new();
        for (title, price) in [("Laptop", 1200.0), ("Novel", 15.99), ("T-Shirt", 25.5)] {
            let item = items
                .create(NewItem {
                    title: title.to_string(),
                    description: None,
                    price,
                    category_ids: vec![],
                })
                .await
                .unwrap();
            item_ids.push(item.id);
        }

        Fixture {
            orders: SeaOrmOrderRepository::new(db.clone()),
            db,
            customer_ids,
            item_ids,
        }
    }

    fn line(shop_item_id: i32, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            shop_item_id,
            quantity,
        }
    }

    async fn line_count(db: &DatabaseConnection) -> u64 {
        order_line::Entity::find().count(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_embeds_customer_and_items() {
        let f = fixture().await;

        let order = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![line(f.item_ids[0], 1), line(f.item_ids[1], 2)],
            })
            .await
            .unwrap();

        assert_eq!(order.customer.as_ref().unwrap().name, "John");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 2);
        assert_eq!(order.items[1].shop_item.as_ref().unwrap().title, "Novel");
        assert!(order.items.iter().all(|l| l.order_id == order.id));
    }

    #[tokio::test]
    async fn test_create_is_atomic_when_an_item_is_missing() {
        let f = fixture().await;

        let err = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![line(f.item_ids[0], 1), line(999, 1)],
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "ShopItem with id 999 not found");
        assert!(f.orders.find_all(OrderFilter::default()).await.unwrap().is_empty());
        assert_eq!(line_count(&f.db).await, 0);
    }

    #[tokio::test]
    async fn test_create_requires_existing_customer_and_lines() {
        let f = fixture().await;

        let err = f
            .orders
            .create(NewOrder {
                customer_id: 999,
                lines: vec![line(f.item_ids[0], 1)],
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Customer not found");

        let err = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_entire_line_set() {
        let f = fixture().await;
        let order = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![line(f.item_ids[0], 1), line(f.item_ids[1], 2)],
            })
            .await
            .unwrap();

        let updated = f
            .orders
            .update(
                order.id,
                OrderChanges {
                    customer_id: None,
                    lines: Some(vec![line(f.item_ids[2], 5)]),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.customer_id, f.customer_ids[0]);
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].shop_item_id, f.item_ids[2]);
        assert_eq!(updated.items[0].quantity, 5);
        assert_eq!(line_count(&f.db).await, 1);
    }

    #[tokio::test]
    async fn test_update_with_empty_lines_clears_but_keeps_order() {
        let f = fixture().await;
        let order = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[1],
                lines: vec![line(f.item_ids[0], 1)],
            })
            .await
            .unwrap();

        let updated = f
            .orders
            .update(
                order.id,
                OrderChanges {
                    customer_id: None,
                    lines: Some(vec![]),
                },
            )
            .await
            .unwrap();

        assert!(updated.items.is_empty());
        assert_eq!(updated.customer_id, f.customer_ids[1]);
        assert!(f.orders.find_by_id(order.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_update_changes_nothing() {
        let f = fixture().await;
        let order = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![line(f.item_ids[0], 1), line(f.item_ids[1], 2)],
            })
            .await
            .unwrap();

        let err = f
            .orders
            .update(
                order.id,
                OrderChanges {
                    customer_id: Some(f.customer_ids[1]),
                    lines: Some(vec![line(f.item_ids[2], 1), line(777, 1)]),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let fetched = f.orders.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn test_update_customer_only_keeps_lines() {
        let f = fixture().await;
        let order = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![line(f.item_ids[0], 1)],
            })
            .await
            .unwrap();

        let updated = f
            .orders
            .update(
                order.id,
                OrderChanges {
                    customer_id: Some(f.customer_ids[1]),
                    lines: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.customer.unwrap().name, "Jane");
        assert_eq!(updated.items, order.items);

        let err = f
            .orders
            .update(
                order.id,
                OrderChanges {
                    customer_id: Some(999),
                    lines: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "New customer not found");
    }

    #[tokio::test]
    async fn test_delete_cascades_lines_and_unblocks_item() {
        let f = fixture().await;
        let items = SeaOrmItemRepository::new(f.db.clone());
        let order = f
            .orders
            .create(NewOrder {
                customer_id: f.customer_ids[0],
                lines: vec![line(f.item_ids[0], 1)],
            })
            .await
            .unwrap();

        let err = items.delete(f.item_ids[0]).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        f.orders.delete(order.id).await.unwrap();
        assert_eq!(line_count(&f.db).await, 0);
        assert!(f.orders.find_by_id(order.id).await.unwrap().is_none());

        items.delete(f.item_ids[0]).await.unwrap();

        let err = f.orders.delete(order.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_all_filters_by_customer() {
        let f = fixture().await;
        for customer_id in [f.customer_ids[0], f.customer_ids[1], f.customer_ids[0]] {
            f.orders
                .create(NewOrder {
                    customer_id,
                    lines: vec![line(f.item_ids[1], 1)],
                })
                .await
                .unwrap();
        }

        let all = f.orders.find_all(OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let johns = f
            .orders
            .find_all(OrderFilter {
                customer_id: Some(f.customer_ids[0]),
            })
            .await
            .unwrap();
        assert_eq!(johns.len(), 2);
        assert!(johns.iter().all(|o| o.customer_id == f.customer_ids[0]));
    }
}
