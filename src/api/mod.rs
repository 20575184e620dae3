pub mod category;
pub mod customer;
pub mod error;
pub mod extract;
pub mod health;
pub mod item;
pub mod order;

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

pub use error::ApiError;

/// All resource routes, mounted at the root
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Customers
        .route(
            "/customers",
            get(customer::list_customers).post(customer::create_customer),
        )
        .route(
            "/customers/:id",
            get(customer::get_customer)
                .put(customer::update_customer)
                .delete(customer::delete_customer),
        )
        // Categories
        .route(
            "/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categories/:id",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        // Items
        .route("/items", get(item::list_items).post(item::create_item))
        .route(
            "/items/:id",
            get(item::get_item)
                .put(item::update_item)
                .delete(item::delete_item),
        )
        // Orders
        .route("/orders", get(order::list_orders).post(order::create_order))
        .route(
            "/orders/:id",
            get(order::get_order)
                .put(order::update_order)
                .delete(order::delete_order),
        )
        .with_state(state)
}
