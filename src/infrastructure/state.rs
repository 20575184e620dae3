//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CategoryRepository, CustomerRepository, ItemRepository, OrderRepository};
use crate::infrastructure::{
    SeaOrmCategoryRepository, SeaOrmCustomerRepository, SeaOrmItemRepository,
    SeaOrmOrderRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub item_repo: Arc<dyn ItemRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            customer_repo: Arc::new(SeaOrmCustomerRepository::new(db.clone())),
            category_repo: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            item_repo: Arc::new(SeaOrmItemRepository::new(db.clone())),
            order_repo: Arc::new(SeaOrmOrderRepository::new(db.clone())),
            db,
        }
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
