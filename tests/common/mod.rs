#![allow(dead_code)]

use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::app;
use trivia_api::settings::DatabaseSettings;
use trivia_api::transfer::import_data;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    pub body: Value,
}

/// Fresh in-memory database: schema and the six categories, no questions.
pub async fn empty_app() -> TestApp {
    let pool = establish_connection(&DatabaseSettings::in_memory())
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    TestApp {
        router: app(pool.clone()),
        pool,
    }
}

/// Fresh database loaded with the bundled sample data (19 questions).
pub async fn seeded_app() -> TestApp {
    let test_app = empty_app().await;
    import_data(
        &test_app.pool,
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("data"),
    )
    .await
    .unwrap();
    test_app
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            text,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

pub fn assert_error(response: &TestResponse, code: u16, message: &str) {
    assert_eq!(response.status.as_u16(), code);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], code);
    assert_eq!(response.body["message"], message);
}
