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
use super::extract::{JsonBody, double_option, update_body};
use crate::domain::{validation, CategoryChanges, DomainError, NewCategory};
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub title: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses((status = 200, description = "All categories", body = [crate::domain::Category]))
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<Response, ApiError> {
    let categories = state.category_repo.find_all().await?;
    Ok((StatusCode::OK, Json(categories)).into_response())
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = crate::domain::Category),
        (status = 400, description = "Missing title", body = crate::api::error::ErrorBody),
        (status = 409, description = "Title already in use", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCategoryRequest>,
) -> Result<Response, ApiError> {
    let input = NewCategory {
        title: validation::required_text("title", payload.title)?,
        description: payload.description,
    };
    let category = state.category_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)).into_response())
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = crate::domain::Category),
        (status = 404, description = "Category not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.category_repo.find_by_id(id).await? {
        Some(category) => Ok((StatusCode::OK, Json(category)).into_response()),
        None => Err(DomainError::not_found("Category").into()),
    }
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = crate::domain::Category),
        (status = 400, description = "Empty or invalid body", body = crate::api::error::ErrorBody),
        (status = 404, description = "Category not found", body = crate::api::error::ErrorBody),
        (status = 409, description = "Title already in use", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    if state.category_repo.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found("Category").into());
    }

    let payload: UpdateCategoryRequest = update_body(body)?;
    let changes = CategoryChanges {
        title: validation::text_change("title", payload.title)?,
        description: payload.description,
    };
    let category = state.category_repo.update(id, changes).await?;
    Ok((StatusCode::OK, Json(category)).into_response())
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::api::error::ErrorBody),
        (status = 409, description = "Category still associated with items", body = crate::api::error::ErrorBody)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.category_repo.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Category deleted" }))).into_response())
}
