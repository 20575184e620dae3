//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};

use super::guards;
use crate::domain::{Category, CategoryChanges, CategoryRepository, DomainError, NewCategory};
use crate::models::category::{self, ActiveModel, Entity as CategoryEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(category.map(Category::from))
    }

    async fn create(&self, input: NewCategory) -> Result<Category, DomainError> {
        let txn = self.db.begin().await?;

        if guards::category_title_taken(&txn, &input.title, None).await? {
            return Err(DomainError::Conflict(
                "Category with this title already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let category = ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = category.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(category_id = result.id, "Category created");
        Ok(Category::from(result))
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, DomainError> {
        let txn = self.db.begin().await?;

        let existing = CategoryEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))?;

        if let Some(title) = &changes.title
            && *title != existing.title
            && guards::category_title_taken(&txn, title, Some(id)).await?
        {
            return Err(DomainError::Conflict(
                "Another category with this title already exists".to_string(),
            ));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(category_id = id, "Category updated");
        Ok(Category::from(model))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if CategoryEntity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("Category"));
        }

        if guards::category_in_use(&txn, id).await? {
            tracing::warn!(category_id = id, "Refusing to delete category in use");
            return Err(DomainError::Conflict(
                "Cannot delete category as it is associated with shop items. Remove associations first."
                    .to_string(),
            ));
        }

        CategoryEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}
