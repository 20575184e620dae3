//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

/// Customer data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated input for creating a customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// Partial customer update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

/// Repository trait for Customer entity
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find all customers, ordered by id
    async fn find_all(&self) -> Result<Vec<Customer>, DomainError>;

    /// Find a customer by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError>;

    /// Create a new customer; the email must not be in use
    async fn create(&self, input: NewCustomer) -> Result<Customer, DomainError>;

    /// Apply a partial update
    async fn update(&self, id: i32, changes: CustomerChanges) -> Result<Customer, DomainError>;

    /// Delete a customer together with its orders and their lines
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Category data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
    pub description: Option<String>,
}

/// Partial category update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

/// Repository trait for Category entity
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;

    async fn create(&self, input: NewCategory) -> Result<Category, DomainError>;

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, DomainError>;

    /// Delete a category; refused while any item is associated with it
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Shop item with its resolved categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_ids: Vec<i32>,
    pub categories: Vec<Category>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    /// Exact category set of the new item (may be empty)
    pub category_ids: Vec<i32>,
}

/// Partial item update.
///
/// `category_ids: Some(ids)` replaces the whole category set, so an empty
/// list clears every association; `None` keeps the current set.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub category_ids: Option<Vec<i32>>,
}

/// Repository trait for Item entity
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Item>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Item>, DomainError>;

    async fn create(&self, input: NewItem) -> Result<Item, DomainError>;

    async fn update(&self, id: i32, changes: ItemChanges) -> Result<Item, DomainError>;

    /// Delete an item; refused while any order line references it
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// One (item, quantity) pair of an order, with the item embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub shop_item_id: i32,
    pub quantity: i32,
    pub shop_item: Option<Item>,
}

/// Order with its customer and line items resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub customer: Option<Customer>,
    pub items: Vec<OrderLine>,
    pub created_at: String,
    pub updated_at: String,
}

/// Order line as received from a client, before validation
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawOrderLine {
    pub shop_item_id: Option<i32>,
    /// Kept as raw JSON so that non-integer quantities can be reported precisely
    #[schema(value_type = Option<i64>)]
    pub quantity: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub shop_item_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i32,
    pub lines: Vec<NewOrderLine>,
}

/// Order update. Customer reassignment and line replacement are independent;
/// `lines: Some(vec![])` removes every line.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub customer_id: Option<i32>,
    pub lines: Option<Vec<NewOrderLine>>,
}

/// Filter criteria for order queries
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub customer_id: Option<i32>,
}

/// Repository trait for Order entity
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;

    /// Create an order and all of its lines atomically
    async fn create(&self, input: NewOrder) -> Result<Order, DomainError>;

    /// Update an order atomically; nothing is persisted if any part fails
    async fn update(&self, id: i32, changes: OrderChanges) -> Result<Order, DomainError>;

    /// Delete an order and its lines
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
