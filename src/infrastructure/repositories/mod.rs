//! Repository implementations using SeaORM

mod aggregates;
mod guards;

pub mod category_repository;
pub mod customer_repository;
pub mod item_repository;
pub mod order_repository;

pub use category_repository::SeaOrmCategoryRepository;
pub use customer_repository::SeaOrmCustomerRepository;
pub use item_repository::SeaOrmItemRepository;
pub use order_repository::SeaOrmOrderRepository;
