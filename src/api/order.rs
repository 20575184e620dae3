use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use super::error::ApiError;
use super::extract::{JsonBody, double_option, update_body};
use crate::domain::{
    validation, DomainError, NewOrder, OrderChanges, OrderFilter, RawOrderLine,
};
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    /// Only orders owned by this customer
    pub customer_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Option<i32>,
    pub items: Option<Vec<RawOrderLine>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    /// Reassign the order; `null` is ignored
    pub customer_id: Option<i32>,
    /// Replaces every line; `[]` or `null` removes them all
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<RawOrderLine>>)]
    pub items: Option<Option<Vec<RawOrderLine>>>,
}

impl UpdateOrderRequest {
    fn validate(self) -> Result<OrderChanges, DomainError> {
        let lines = match self.items {
            Some(raw) => Some(validation::order_lines(raw.unwrap_or_default())?),
            None => None,
        };

        Ok(OrderChanges {
            customer_id: self.customer_id,
            lines,
        })
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(OrderQuery),
    responses((status = 200, description = "Orders with customer and line items", body = [crate::domain::Order]))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Response, ApiError> {
    let filter = OrderFilter {
        customer_id: query.customer_id,
    };
    let orders = state.order_repo.find_all(filter).await?;
    Ok((StatusCode::OK, Json(orders)).into_response())
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created with all of its lines", body = crate::domain::Order),
        (status = 400, description = "Missing fields, no lines or invalid quantity", body = crate::api::error::ErrorBody),
        (status = 404, description = "Customer or shop item not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    let (customer_id, items) = validation::order_request(payload.customer_id, payload.items)?;
    if state.customer_repo.find_by_id(customer_id).await?.is_none() {
        return Err(DomainError::not_found("Customer").into());
    }

    let input = NewOrder {
        customer_id,
        lines: validation::order_lines(items)?,
    };
    let order = state.order_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(order)).into_response())
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = crate::domain::Order),
        (status = 404, description = "Order not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.order_repo.find_by_id(id).await? {
        Some(order) => Ok((StatusCode::OK, Json(order)).into_response()),
        None => Err(DomainError::not_found("Order").into()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = crate::domain::Order),
        (status = 400, description = "Empty body or invalid line", body = crate::api::error::ErrorBody),
        (status = 404, description = "Order, customer or shop item not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    if state.order_repo.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found("Order").into());
    }

    let payload: UpdateOrderRequest = update_body(body)?;
    if let Some(customer_id) = payload.customer_id
        && state.customer_repo.find_by_id(customer_id).await?.is_none()
    {
        return Err(DomainError::NotFound("New customer not found".to_string()).into());
    }

    let changes = payload.validate()?;
    let order = state.order_repo.update(id, changes).await?;
    Ok((StatusCode::OK, Json(order)).into_response())
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order and its lines deleted"),
        (status = 404, description = "Order not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.order_repo.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Order deleted" }))).into_response())
}
