use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use shop_api::{db, seed, server};
use tower::util::ServiceExt; // for `oneshot`

// Helper to build the full application on a fresh in-memory database
async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    server::build_router(db)
}

async fn send(app: &Router, method: &str, uri: &str, payload: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match payload {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "shop-api");
}

#[tokio::test]
async fn test_shop_scenario_end_to_end() {
    let app = setup_app().await;

    let (status, category) = send(&app, "POST", "/categories", Some(json!({ "title": "Books" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["id"], 1);

    let (status, item) = send(
        &app,
        "POST",
        "/items",
        Some(json!({ "title": "Novel", "price": 15.99, "category_ids": [1] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["category_ids"], json!([1]));
    assert_eq!(item["categories"][0]["title"], "Books");

    let (status, customer) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "A", "surname": "B", "email": "a@b.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(customer["id"], 1);

    let (status, order) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({ "customer_id": 1, "items": [{ "shop_item_id": 1, "quantity": 2 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["items"][0]["quantity"], 2);
    assert_eq!(order["items"][0]["shop_item"]["title"], "Novel");
    assert_eq!(order["customer"]["email"], "a@b.com");
    let order_id = order["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = send(&app, "DELETE", "/customers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted");

    let (status, orders) = send(&app, "GET", "/orders?customer_id=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([]));

    let (status, _) = send(&app, "GET", &format!("/orders/{}", order_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // With its only order gone the item is free to delete
    let (status, _) = send(&app, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_customer_crud() {
    let app = setup_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "Ada", "surname": "Lovelace", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert!(created["created_at"].is_string());

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/customers/{}", id),
        Some(json!({ "surname": "King" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["surname"], "King");

    let (status, list) = send(&app, "GET", "/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, fetched) = send(&app, "GET", &format!("/customers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, _) = send(&app, "DELETE", &format!("/customers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/customers/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn test_category_crud_and_description_clear() {
    let app = setup_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "title": "Toys", "description": "For kids" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/categories/{}", id),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Toys");
    assert!(updated["description"].is_null());

    let (status, body) = send(&app, "DELETE", &format!("/categories/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted");

    let (status, _) = send(&app, "DELETE", &format!("/categories/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_category_set_round_trip_and_replace() {
    let app = setup_app().await;

    let (_, a) = send(&app, "POST", "/categories", Some(json!({ "title": "A" }))).await;
    let (_, b) = send(&app, "POST", "/categories", Some(json!({ "title": "B" }))).await;
    let (a, b) = (a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap());

    let (status, item) = send(
        &app,
        "POST",
        "/items",
        Some(json!({ "title": "Lamp", "price": 30, "category_ids": [b, a] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = item["id"].as_i64().unwrap();

    let (_, fetched) = send(&app, "GET", &format!("/items/{}", id), None).await;
    let mut ids: Vec<i64> = fetched["category_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec![a, b]);

    let (status, replaced) = send(
        &app,
        "PUT",
        &format!("/items/{}", id),
        Some(json!({ "category_ids": [a] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["category_ids"], json!([a]));

    // Category b is no longer referenced
    let (status, _) = send(&app, "DELETE", &format!("/categories/{}", b), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, cleared) = send(
        &app,
        "PUT",
        &format!("/items/{}", id),
        Some(json!({ "category_ids": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["categories"], json!([]));
    assert_eq!(cleared["price"], 30.0);
}

#[tokio::test]
async fn test_order_update_replaces_and_clears_lines() {
    let app = setup_app().await;

    let (_, c1) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "A", "surname": "B", "email": "a@b.com" })),
    )
    .await;
    let (_, c2) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "C", "surname": "D", "email": "c@d.com" })),
    )
    .await;
    let (_, pen) = send(&app, "POST", "/items", Some(json!({ "title": "Pen", "price": 1.5 }))).await;
    let (_, ink) = send(&app, "POST", "/items", Some(json!({ "title": "Ink", "price": 4 }))).await;

    let (_, order) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": c1["id"],
            "items": [{ "shop_item_id": pen["id"], "quantity": 3 }]
        })),
    )
    .await;
    let uri = format!("/orders/{}", order["id"]);

    let (status, replaced) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({
            "customer_id": c2["id"],
            "items": [
                { "shop_item_id": ink["id"], "quantity": 1 },
                { "shop_item_id": pen["id"], "quantity": 10 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["customer_id"], c2["id"]);
    assert_eq!(replaced["items"].as_array().unwrap().len(), 2);
    assert_eq!(replaced["items"][0]["shop_item"]["title"], "Ink");
    assert_eq!(replaced["items"][1]["quantity"], 10);

    let (status, cleared) = send(&app, "PUT", &uri, Some(json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["items"], json!([]));
    assert_eq!(cleared["customer_id"], c2["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order deleted");

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_seeded_data_is_served() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    seed::seed_demo_data(&db).await.expect("Failed to seed");
    let app = server::build_router(db);

    let (_, customers) = send(&app, "GET", "/customers", None).await;
    assert_eq!(customers.as_array().unwrap().len(), 2);

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert!(orders.iter().all(|o| o["customer"].is_object()));
    assert!(
        orders
            .iter()
            .flat_map(|o| o["items"].as_array().unwrap())
            .all(|line| line["shop_item"]["title"].is_string())
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_app().await;

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/orders/{id}"].is_object());
}
