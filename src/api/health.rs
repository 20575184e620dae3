use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_check(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    if let Err(e) = db.execute_unprepared("SELECT 1").await {
        tracing::error!(error = %e, "Health check failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "service": "shop-api",
                "version": env!("CARGO_PKG_VERSION")
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "shop-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
