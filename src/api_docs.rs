use crate::api;
use crate::domain::{Category, Customer, Item, Order, OrderLine, RawOrderLine};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::customer::list_customers,
        api::customer::create_customer,
        api::customer::get_customer,
        api::customer::update_customer,
        api::customer::delete_customer,
        api::category::list_categories,
        api::category::create_category,
        api::category::get_category,
        api::category::update_category,
        api::category::delete_category,
        api::item::list_items,
        api::item::create_item,
        api::item::get_item,
        api::item::update_item,
        api::item::delete_item,
        api::order::list_orders,
        api::order::create_order,
        api::order::get_order,
        api::order::update_order,
        api::order::delete_order,
    ),
    components(
        schemas(
            Customer,
            Category,
            Item,
            Order,
            OrderLine,
            RawOrderLine,
            api::customer::CreateCustomerRequest,
            api::customer::UpdateCustomerRequest,
            api::category::CreateCategoryRequest,
            api::category::UpdateCategoryRequest,
            api::item::CreateItemRequest,
            api::item::UpdateItemRequest,
            api::order::CreateOrderRequest,
            api::order::UpdateOrderRequest,
            api::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "customers", description = "Customer management"),
        (name = "categories", description = "Item categories"),
        (name = "items", description = "Shop items and their categories"),
        (name = "orders", description = "Orders and their line items")
    )
)]
pub struct ApiDoc;
