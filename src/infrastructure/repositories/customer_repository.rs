//! SeaORM implementation of CustomerRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::guards;
use crate::domain::{Customer, CustomerChanges, CustomerRepository, DomainError, NewCustomer};
use crate::models::customer::{self, ActiveModel, Entity as CustomerEntity};
use crate::models::{order, order_line};

/// SeaORM-based implementation of CustomerRepository
pub struct SeaOrmCustomerRepository {
    db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DomainError> {
        let customers = CustomerEntity::find()
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await?;

        Ok(customers.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError> {
        let customer = CustomerEntity::find_by_id(id).one(&self.db).await?;
        Ok(customer.map(Customer::from))
    }

    async fn create(&self, input: NewCustomer) -> Result<Customer, DomainError> {
        let txn = self.db.begin().await?;

        if guards::email_taken(&txn, &input.email, None).await? {
            tracing::warn!(email = %input.email, "Refusing duplicate customer email");
            return Err(DomainError::Conflict(
                "Customer with this email already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let customer = ActiveModel {
            name: Set(input.name),
            surname: Set(input.surname),
            email: Set(input.email),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = customer.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(customer_id = result.id, "Customer created");
        Ok(Customer::from(result))
    }

    async fn update(&self, id: i32, changes: CustomerChanges) -> Result<Customer, DomainError> {
        let txn = self.db.begin().await?;

        let existing = CustomerEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer"))?;

        if let Some(email) = &changes.email
            && *email != existing.email
            && guards::email_taken(&txn, email, Some(id)).await?
        {
            tracing::warn!(customer_id = id, email = %email, "Refusing email collision");
            return Err(DomainError::Conflict(
                "Another customer with this email already exists".to_string(),
            ));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(surname) = changes.surname {
            active.surname = Set(surname);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(customer_id = id, "Customer updated");
        Ok(Customer::from(model))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if CustomerEntity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("Customer"));
        }

        // Cascade: the customer's orders and their lines go in the same transaction
        let order_ids: Vec<i32> = order::Entity::find()
            .select_only()
            .column(order::Column::Id)
            .filter(order::Column::CustomerId.eq(id))
            .into_tuple::<i32>()
            .all(&txn)
            .await?;

        if !order_ids.is_empty() {
            order_line::Entity::delete_many()
                .filter(order_line::Column::OrderId.is_in(order_ids.clone()))
                .exec(&txn)
                .await?;
            order::Entity::delete_many()
                .filter(order::Column::Id.is_in(order_ids.clone()))
                .exec(&txn)
                .await?;
        }

        CustomerEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            customer_id = id,
            orders_removed = order_ids.len(),
            "Customer deleted"
        );
        Ok(())
    }
}
