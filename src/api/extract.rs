//! Request body extraction with JSON error bodies

use axum::extract::FromRequest;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::ApiError;

/// `axum::Json` whose rejections are reported as `ApiError` (400)
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Keeps "field present with null" apart from "field absent".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Decode a partial-update body. It must be a non-empty JSON object.
pub fn update_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    match &body {
        Value::Object(fields) if fields.is_empty() => {
            return Err(ApiError::bad_request("No input data provided"));
        }
        Value::Object(_) => {}
        _ => return Err(ApiError::bad_request("Request body must be a JSON object")),
    }

    serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}
