use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::error::ApiError;
use super::extract::{JsonBody, update_body};
use crate::domain::{validation, CustomerChanges, DomainError, NewCustomer};
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl CreateCustomerRequest {
    fn validate(self) -> Result<NewCustomer, DomainError> {
        let name = validation::required_text("name", self.name)?;
        let surname = validation::required_text("surname", self.surname)?;
        let email = validation::required_text("email", self.email)?;
        validation::email(&email)?;

        Ok(NewCustomer {
            name,
            surname,
            email,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl UpdateCustomerRequest {
    fn validate(self) -> Result<CustomerChanges, DomainError> {
        let email = validation::text_change("email", self.email)?;
        if let Some(email) = &email {
            validation::email(email)?;
        }

        Ok(CustomerChanges {
            name: validation::text_change("name", self.name)?,
            surname: validation::text_change("surname", self.surname)?,
            email,
        })
    }
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    responses((status = 200, description = "All customers", body = [crate::domain::Customer]))
)]
pub async fn list_customers(State(state): State<AppState>) -> Result<Response, ApiError> {
    let customers = state.customer_repo.find_all().await?;
    Ok((StatusCode::OK, Json(customers)).into_response())
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = crate::domain::Customer),
        (status = 400, description = "Missing or invalid field", body = crate::api::error::ErrorBody),
        (status = 409, description = "Email already in use", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCustomerRequest>,
) -> Result<Response, ApiError> {
    let input = payload.validate()?;
    let customer = state.customer_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)).into_response())
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = crate::domain::Customer),
        (status = 404, description = "Customer not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.customer_repo.find_by_id(id).await? {
        Some(customer) => Ok((StatusCode::OK, Json(customer)).into_response()),
        None => Err(DomainError::not_found("Customer").into()),
    }
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = crate::domain::Customer),
        (status = 400, description = "Empty or invalid body", body = crate::api::error::ErrorBody),
        (status = 404, description = "Customer not found", body = crate::api::error::ErrorBody),
        (status = 409, description = "Email already in use", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    if state.customer_repo.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found("Customer").into());
    }

    let changes = update_body::<UpdateCustomerRequest>(body)?.validate()?;
    let customer = state.customer_repo.update(id, changes).await?;
    Ok((StatusCode::OK, Json(customer)).into_response())
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer and its orders deleted"),
        (status = 404, description = "Customer not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.customer_repo.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Customer deleted" }))).into_response())
}
