//! # Handler Tests
//!
//! End-to-end tests of the `/crypto` routes against an in-memory database, driven
//! through the full router (auth middleware included) with `tower::ServiceExt::oneshot`.


use crate::server::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use lib_core::dto::{ErrorResponse, RegisterResponse};
use lib_core::{run_migrations, Config, DbPool};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

/// Setup an in-memory test database with the schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    run_migrations(&pool).await.expect("Failed to run migrations");

    pool
}

/// Create test config
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        jwt_expiration_hours: 1,
        verify_email_domain: false,
    }
}

/// Create the full application router over `pool`.
pub fn test_app(pool: DbPool) -> Router {
    create_router(AppState::new(pool, &test_config()), &[])
}

pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn register_body(email: &str) -> Value {
    json!({
        "name": "Alice",
        "last_name": "Smith",
        "email": email,
        "pass": "TestPassword123",
    })
}

/// Register a user and return its access token.
pub async fn register_user(app: &Router, email: &str) -> String {
    let response = send(app, "POST", "/crypto/register", None, Some(register_body(email))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json::<RegisterResponse>(response).await.access_token
}

pub async fn assert_error(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.code, code);
}
