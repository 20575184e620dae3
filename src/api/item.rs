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
use crate::domain::{validation, DomainError, ItemChanges, NewItem};
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// Categories to associate; omitted or `null` means none
    pub category_ids: Option<Vec<i32>>,
}

impl CreateItemRequest {
    fn validate(self) -> Result<NewItem, DomainError> {
        let title = validation::required_text("title", self.title)?;
        let price = validation::price(validation::required("price", self.price)?)?;

        Ok(NewItem {
            title,
            description: self.description,
            price,
            category_ids: self.category_ids.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    /// Replaces the whole category set; `[]` or `null` clears it
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<i32>>)]
    pub category_ids: Option<Option<Vec<i32>>>,
}

impl UpdateItemRequest {
    fn validate(self) -> Result<ItemChanges, DomainError> {
        Ok(ItemChanges {
            title: validation::text_change("title", self.title)?,
            description: self.description,
            price: self.price.map(validation::price).transpose()?,
            category_ids: self.category_ids.map(Option::unwrap_or_default),
        })
    }
}

#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses((status = 200, description = "All items with their categories", body = [crate::domain::Item]))
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Response, ApiError> {
    let items = state.item_repo.find_all().await?;
    Ok((StatusCode::OK, Json(items)).into_response())
}

#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = crate::domain::Item),
        (status = 400, description = "Missing or invalid field", body = crate::api::error::ErrorBody),
        (status = 404, description = "Unknown category id", body = crate::api::error::ErrorBody),
        (status = 409, description = "Title already in use", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateItemRequest>,
) -> Result<Response, ApiError> {
    let input = payload.validate()?;
    let item = state.item_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item found", body = crate::domain::Item),
        (status = 404, description = "Item not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    match state.item_repo.find_by_id(id).await? {
        Some(item) => Ok((StatusCode::OK, Json(item)).into_response()),
        None => Err(DomainError::not_found("Item").into()),
    }
}

#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = crate::domain::Item),
        (status = 400, description = "Empty or invalid body", body = crate::api::error::ErrorBody),
        (status = 404, description = "Item or category not found", body = crate::api::error::ErrorBody),
        (status = 409, description = "Title already in use", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    if state.item_repo.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found("Item").into());
    }

    let changes = update_body::<UpdateItemRequest>(body)?.validate()?;
    let item = state.item_repo.update(id, changes).await?;
    Ok((StatusCode::OK, Json(item)).into_response())
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found", body = crate::api::error::ErrorBody),
        (status = 409, description = "Item is part of existing orders", body = crate::api::error::ErrorBody)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.item_repo.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Item deleted" }))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_price() {
        let err = CreateItemRequest {
            title: Some("Pen".into()),
            description: None,
            price: None,
            category_ids: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: price");
    }

    #[test]
    fn test_update_null_category_ids_clears() {
        let changes = UpdateItemRequest {
            category_ids: Some(None),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.category_ids, Some(vec![]));

        let changes = UpdateItemRequest::default().validate().unwrap();
        assert_eq!(changes.category_ids, None);
    }

    #[test]
    fn test_update_rejects_negative_price() {
        let err = UpdateItemRequest {
            price: Some(-1.0),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));
    }
}
