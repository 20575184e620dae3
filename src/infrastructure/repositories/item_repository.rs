//! SeaORM implementation of ItemRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{aggregates, guards};
use crate::domain::{DomainError, Item, ItemChanges, ItemRepository, NewItem};
use crate::models::item::{self, ActiveModel, Entity as ItemEntity};
use crate::models::item_categories;

/// SeaORM-based implementation of ItemRepository
pub struct SeaOrmItemRepository {
    db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Make `category_ids` the exact category set of the item
async fn replace_categories(
    txn: &DatabaseTransaction,
    item_id: i32,
    category_ids: &[i32],
) -> Result<(), DomainError> {
    item_categories::Entity::delete_many()
        .filter(item_categories::Column::ItemId.eq(item_id))
        .exec(txn)
        .await?;

    if category_ids.is_empty() {
        return Ok(());
    }

    let links = category_ids.iter().map(|category_id| item_categories::ActiveModel {
        item_id: Set(item_id),
        category_id: Set(*category_id),
    });
    item_categories::Entity::insert_many(links).exec(txn).await?;

    Ok(())
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>, DomainError> {
        let items = ItemEntity::find()
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;

        aggregates::items_with_categories(&self.db, items).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Item>, DomainError> {
        match ItemEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(aggregates::item_with_categories(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, input: NewItem) -> Result<Item, DomainError> {
        let txn = self.db.begin().await?;

        if guards::item_title_taken(&txn, &input.title, None).await? {
            return Err(DomainError::Conflict(
                "Item with this title already exists".to_string(),
            ));
        }
        let category_ids = guards::resolve_categories(&txn, &input.category_ids).await?;

        let now = chrono::Utc::now().to_rfc3339();
        let item = ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            price: Set(input.price),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = item.insert(&txn).await?;
        replace_categories(&txn, result.id, &category_ids).await?;
        txn.commit().await?;

        tracing::info!(
            item_id = result.id,
            categories = category_ids.len(),
            "Item created"
        );
        aggregates::item_with_categories(&self.db, result).await
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> Result<Item, DomainError> {
        let txn = self.db.begin().await?;

        let existing = ItemEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Item"))?;

        if let Some(title) = &changes.title
            && *title != existing.title
            && guards::item_title_taken(&txn, title, Some(id)).await?
        {
            return Err(DomainError::Conflict(
                "Another item with this title already exists".to_string(),
            ));
        }

        // Presence alone triggers replacement, so an empty list clears the set
        if let Some(requested) = &changes.category_ids {
            let category_ids = guards::resolve_categories(&txn, requested).await?;
            replace_categories(&txn, id, &category_ids).await?;
        }

        let mut active: ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(item_id = id, "Item updated");
        aggregates::item_with_categories(&self.db, model).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if ItemEntity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("Item"));
        }

        if guards::item_in_use(&txn, id).await? {
            tracing::warn!(item_id = id, "Refusing to delete item referenced by orders");
            return Err(DomainError::Conflict(
                "Cannot delete item as it is part of existing orders. Remove it from those orders first."
                    .to_string(),
            ));
        }

        item_categories::Entity::delete_many()
            .filter(item_categories::Column::ItemId.eq(id))
            .exec(&txn)
            .await?;
        ItemEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(item_id = id, "Item deleted");
        Ok(())
    }
}
