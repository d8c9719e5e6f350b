//! tally-api: REST API server for tally list items
//!
//! Provides HTTP endpoints for CRUD operations on the in-memory store.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tally_core::{Config, DeleteQuery, Error, ItemQuery, ItemStore, ListItem};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
///
/// The store itself is synchronous; the RwLock provides the mutual
/// exclusion the transport needs for concurrent requests.
struct AppState {
    store: RwLock<ItemStore>,
    seed_default: u32,
}

/// Query parameters for the seed route
#[derive(Debug, Deserialize)]
struct SeedQuery {
    #[serde(default)]
    n: Option<u32>,
}

/// API response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map core errors to HTTP status codes
fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::IndexConflict(_) | Error::MissingSelector => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List items, filtered by specific index or inclusive range
async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ItemQuery>,
) -> impl IntoResponse {
    let store = state.store.read().unwrap();
    let items = store.query(&query);
    (StatusCode::OK, Json(ApiResponse::ok(items)))
}

/// Add a batch of items
async fn add_items(
    State(state): State<Arc<AppState>>,
    Json(new_items): Json<Vec<ListItem>>,
) -> impl IntoResponse {
    let count = new_items.len();
    let mut store = state.store.write().unwrap();
    match store.add(new_items) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(serde_json::json!({ "added": count }))),
        ),
        Err(e) => (
            error_status(&e),
            Json(ApiResponse::<serde_json::Value>::err(e.to_string())),
        ),
    }
}

/// Replace a batch of existing items wholesale
async fn update_items(
    State(state): State<Arc<AppState>>,
    Json(updated_items): Json<Vec<ListItem>>,
) -> impl IntoResponse {
    let count = updated_items.len();
    let mut store = state.store.write().unwrap();
    match store.update(updated_items) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "updated": count }))),
        ),
        Err(e) => (
            error_status(&e),
            Json(ApiResponse::<serde_json::Value>::err(e.to_string())),
        ),
    }
}

/// Delete items by specific index, range, or exact content
async fn delete_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> impl IntoResponse {
    let mut store = state.store.write().unwrap();
    match store.delete(&query) {
        Ok(removed) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "removed": removed }))),
        ),
        Err(e) => (
            error_status(&e),
            Json(ApiResponse::<serde_json::Value>::err(e.to_string())),
        ),
    }
}

/// Dump the entire collection (debug)
async fn dump_items(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.read().unwrap();
    (StatusCode::OK, Json(ApiResponse::ok(store.items().to_vec())))
}

/// Clear the entire collection (debug)
async fn clear_items(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut store = state.store.write().unwrap();
    let cleared = store.len();
    store.clear();
    (
        StatusCode::OK,
        Json(ApiResponse::ok(serde_json::json!({ "cleared": cleared }))),
    )
}

/// Replace the collection with generated items (debug)
async fn seed_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeedQuery>,
) -> impl IntoResponse {
    let count = query.n.unwrap_or(state.seed_default);
    let mut store = state.store.write().unwrap();
    store.seed(count);
    (
        StatusCode::OK,
        Json(ApiResponse::ok(serde_json::json!({ "seeded": count }))),
    )
}

/// Build the router
fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/list/items",
            get(list_items)
                .post(add_items)
                .put(update_items)
                .delete(delete_items),
        )
        .route("/api/dump", get(dump_items))
        .route("/api/clear", get(clear_items))
        .route("/api/seed", get(seed_items))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config =
        Config::load_default().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let state = Arc::new(AppState {
        store: RwLock::new(ItemStore::new()),
        seed_default: config.seed.default_count,
    });

    let app = app(state);

    // Get port from env or config
    let port: u16 = std::env::var("TALLY_API_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    let addr: std::net::SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;
    tracing::info!("Starting tally-api on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(Arc::new(AppState {
            store: RwLock::new(ItemStore::new()),
            seed_default: 8,
        }))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_then_list_returns_sorted_items() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/list/items",
                serde_json::json!([
                    { "index": 2, "content": "b" },
                    { "index": 1, "content": "a" }
                ]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(get_request("/list/items")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["index"], 1);
        assert_eq!(items[1]["index"], 2);
    }

    #[tokio::test]
    async fn test_add_conflict_is_rejected() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/list/items",
                serde_json::json!([{ "index": 1, "content": "a" }]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/list/items",
                serde_json::json!([{ "index": 1, "content": "dup" }]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("collision"));

        // store unchanged
        let response = app.oneshot(get_request("/api/dump")).await.unwrap();
        let body = body_json(response).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["content"], "a");
    }

    #[tokio::test]
    async fn test_list_with_specific_index() {
        let app = test_app();
        app.clone()
            .oneshot(get_request("/api/seed?n=4"))
            .await
            .unwrap();

        let response = app
            .oneshot(get_request("/list/items?specific_index=2"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["content"], "Item 2");
    }

    #[tokio::test]
    async fn test_list_with_range() {
        let app = test_app();
        app.clone()
            .oneshot(get_request("/api/seed?n=6"))
            .await
            .unwrap();

        let response = app
            .oneshot(get_request("/list/items?start_index=1&end_index=3"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["index"], 1);
        assert_eq!(items[2]["index"], 3);
    }

    #[tokio::test]
    async fn test_update_unknown_index_is_404() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/list/items",
                serde_json::json!([{ "index": 7, "content": "ghost" }]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("7"));
    }

    #[tokio::test]
    async fn test_update_replaces_item() {
        let app = test_app();
        app.clone()
            .oneshot(get_request("/api/seed?n=2"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/list/items",
                serde_json::json!([{ "index": 1, "content": "rewritten", "marked": true }]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/list/items?specific_index=1"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items[0]["content"], "rewritten");
        assert_eq!(items[0]["marked"], true);
    }

    #[tokio::test]
    async fn test_delete_requires_selector() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/list/items")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_delete_by_content() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/list/items",
                serde_json::json!([
                    { "index": 1, "content": "keep" },
                    { "index": 2, "content": "drop" },
                    { "index": 3, "content": "drop" }
                ]),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/list/items?content=drop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["removed"], 2);

        let response = app.oneshot(get_request("/list/items")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_and_clear() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(get_request("/api/seed?n=5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(get_request("/api/dump")).await.unwrap();
        let body = body_json(response).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 5);
        let marks: Vec<bool> = items.iter().map(|i| i["marked"].as_bool().unwrap()).collect();
        assert_eq!(marks, vec![true, false, true, false, true]);

        let response = app
            .clone()
            .oneshot(get_request("/api/clear"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/list/items")).await.unwrap();
        let body = body_json(response).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_uses_configured_default() {
        let app = test_app();
        app.clone()
            .oneshot(get_request("/api/seed"))
            .await
            .unwrap();

        let response = app.oneshot(get_request("/api/dump")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_negative_index_is_rejected_at_boundary() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/list/items",
                serde_json::json!([{ "index": -1, "content": "bad" }]),
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
