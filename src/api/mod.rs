//! HTTP server for the journal.
//!
//! Routes live under `/entry`; the OpenAPI document and Swagger UI are served
//! under `/api-docs`.

pub mod docs;
pub mod error;
pub mod routes;

use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::Result;
use crate::storage::{Database, EntryStore};

pub use error::ApiError;

/// Plain `{message}` body used for confirmations and errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Entry not found")]
    pub message: String,
}

/// Shared handler state. Holds no connection; handlers connect per request.
#[derive(Clone)]
pub struct AppState {
    pub store: EntryStore,
}

impl AppState {
    pub fn new(store: EntryStore) -> Self {
        Self { store }
    }
}

/// Build the full application router. `port` is only used to describe the
/// local server in the OpenAPI document.
pub fn router(state: AppState, port: u16) -> Result<Router> {
    let entries = Router::new()
        .route("/entry", get(routes::list_entries).post(routes::create_entry))
        .route("/entry/title/{title}", get(routes::find_entries_by_title))
        .route(
            "/entry/{id}",
            get(routes::get_entry)
                .put(routes::update_entry)
                .delete(routes::delete_entry),
        )
        .with_state(state);

    Ok(entries
        .merge(docs::router(port)?)
        .layer(TraceLayer::new_for_http()))
}

/// Run the server until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let store = EntryStore::new(Database::new(&config.store));
    let app = router(AppState::new(store), config.port)?;

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %config.bind_address(),
        store = %config.store.path.display(),
        "Server is running on port {}",
        config.port
    );
    tracing::info!(
        "API documentation: http://localhost:{}{}",
        config.port,
        docs::UI_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup_app() -> (Router, TempDir) {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig {
            path: tmp.path().join("journal.db"),
            busy_timeout_ms: 1000,
        };
        let store = EntryStore::new(Database::new(&config));
        let app = router(AppState::new(store), 3000).unwrap();
        (app, tmp)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let (app, _tmp) = setup_app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/entry",
            Some(json!({"title": "Day 1", "body": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["createdAt"], created["updatedAt"]);

        let (status, fetched) = send(&app, Method::GET, &format!("/entry/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Day 1");
        assert_eq!(fetched["body"], "Hello");

        std::thread::sleep(std::time::Duration::from_millis(5));

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/entry/{}", id),
            Some(json!({"body": "Hello world"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Day 1");
        assert_eq!(updated["body"], "Hello world");
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_ne!(updated["updatedAt"], created["updatedAt"]);

        let (status, deleted) = send(&app, Method::DELETE, &format!("/entry/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({"message": "Entry deleted"}));

        let (status, missing) = send(&app, Method::GET, &format!("/entry/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing, json!({"message": "Entry not found"}));
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (app, _tmp) = setup_app();

        let bad_bodies = vec![
            json!({"title": "Day 1"}),
            json!({"body": "Hello"}),
            json!({"title": "", "body": "Hello"}),
            json!({"title": "t".repeat(51), "body": "Hello"}),
            json!({"title": "Day 1", "body": "b".repeat(5001)}),
        ];
        for body in bad_bodies {
            let (status, response) = send(&app, Method::POST, "/entry", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(response["message"].is_string());
        }

        let (status, all) = send(&app, Method::GET, "/entry", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _tmp) = setup_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/entry")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let (app, _tmp) = setup_app();
        let unknown = uuid::Uuid::new_v4();

        for uri in [format!("/entry/{}", unknown), "/entry/malformed-id".to_string()] {
            let (status, body) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], "Entry not found");

            let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"body": "x"}))).await;
            assert_eq!(status, StatusCode::NOT_FOUND);

            let (status, _) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let (app, _tmp) = setup_app();

        send(&app, Method::POST, "/entry", Some(json!({"title": "Day 1", "body": "a"}))).await;
        send(&app, Method::POST, "/entry", Some(json!({"title": "Day 2", "body": "b"}))).await;

        let (status, found) = send(&app, Method::GET, "/entry/title/Day%201", None).await;
        assert_eq!(status, StatusCode::OK);
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["body"], "a");

        let (status, none) = send(&app, Method::GET, "/entry/title/Nothing", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(none, json!([]));

        let (status, all) = send(&app, Method::GET, "/entry", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_with_empty_fields_keeps_values() {
        let (app, _tmp) = setup_app();

        let (_, created) = send(
            &app,
            Method::POST,
            "/entry",
            Some(json!({"title": "Day 1", "body": "Hello"})),
        )
        .await;
        let uri = format!("/entry/{}", created["id"].as_str().unwrap());

        let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({"title": "", "body": ""}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Day 1");
        assert_eq!(updated["body"], "Hello");

        let (status, rejected) = send(&app, Method::PUT, &uri, Some(json!({"title": "t".repeat(51)}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            rejected["message"],
            "Validation failed: title too long: 51 characters (max 50)"
        );

        let (_, stored) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(stored["title"], "Day 1");
    }

    #[tokio::test]
    async fn test_update_without_body_refreshes_timestamp() {
        let (app, _tmp) = setup_app();

        let (_, created) = send(
            &app,
            Method::POST,
            "/entry",
            Some(json!({"title": "Day 1", "body": "Hello"})),
        )
        .await;
        let uri = format!("/entry/{}", created["id"].as_str().unwrap());

        std::thread::sleep(std::time::Duration::from_millis(5));

        let (status, updated) = send(&app, Method::PUT, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Day 1");
        assert_eq!(updated["body"], "Hello");
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_ne!(updated["updatedAt"], created["updatedAt"]);

        // A body that is present but not JSON is still rejected
        let request = Request::builder()
            .method(Method::PUT)
            .uri(&uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_server_error() {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig {
            path: tmp.path().join("missing").join("journal.db"),
            busy_timeout_ms: 1000,
        };
        let app = router(AppState::new(EntryStore::new(Database::new(&config))), 3000).unwrap();

        let (status, body) = send(&app, Method::GET, "/entry", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("Connection error"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/entry",
            Some(json!({"title": "Day 1", "body": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let (app, _tmp) = setup_app();

        let (status, doc) = send(&app, Method::GET, docs::JSON_PATH, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["info"]["title"], "Daily Journal API");
        assert!(doc["paths"]["/entry/{id}"]["delete"].is_object());

        let request = Request::builder()
            .uri(docs::YAML_PATH)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/yaml"
        );
    }
}
