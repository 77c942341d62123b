#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use grocery_api::config::{Config, DatabaseConfig, LoggingConfig, RateLimitConfig, SeedConfig, ServerConfig};
use grocery_api::infrastructure::database::sqlite::init_memory;
use grocery_api::infrastructure::rate_limit::FixedWindowLimiter;
use grocery_api::server::{create_app, AppState};

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

pub fn test_config(max_requests: u32) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
        },
        logging: LoggingConfig {
            level: "debug".into(),
            format: "compact".into(),
        },
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests,
        },
        seed: SeedConfig { on_startup: false },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_limit(1_000).await
}

pub async fn spawn_app_with_limit(max_requests: u32) -> TestApp {
    let config = test_config(max_requests);
    let db = init_memory().await.expect("in-memory database");
    let limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
    let state = AppState::new(config, db.clone()).with_rate_limiter(limiter);

    TestApp {
        router: create_app(state),
        db,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// 创建商品并返回其 id
    pub async fn create_product(&self, name: &str, price: f64, sku: Option<&str>) -> String {
        let (status, body) = self
            .post("/api/products", serde_json::json!({ "name": name, "price": price, "sku": sku }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> Value {
        let (status, body) = self
            .post("/api/cart", serde_json::json!({ "productId": product_id, "quantity": quantity }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

pub fn approx(value: &Value, expected: f64) -> bool {
    value.as_f64().is_some_and(|v| (v - expected).abs() < 1e-9)
}
