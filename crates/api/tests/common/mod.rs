//! Shared fixtures for API integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use photoai_api::app::build_app;
use photoai_api::auth::jwt::{generate_access_token, JwtConfig};
use photoai_api::config::ServerConfig;
use photoai_api::state::AppState;
use photoai_falai::{AiProvider, FalAiError, Submission};
use photoai_pipeline::JobCorrelator;
use photoai_storage::{S3Config, UploadGateway};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_WEBHOOK_SECRET: &str = "whsec-test";

/// In-memory provider. Training ids are `train-<n>`, generation ids
/// `img-<prompt>`. The prompt `boom` is rejected; `fail_all` makes every
/// call report an outage.
#[derive(Default)]
pub struct FakeProvider {
    pub trainings: AtomicUsize,
    pub fail_all: bool,
}

#[async_trait]
impl AiProvider for FakeProvider {
    async fn submit_training(&self, _: &str, _: &str) -> Result<Submission, FalAiError> {
        if self.fail_all {
            return Err(FalAiError::Unavailable("connection refused".into()));
        }
        let n = self.trainings.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Submission {
            request_id: format!("train-{n}"),
            response_url: None,
        })
    }

    async fn submit_generation(&self, prompt: &str, _: &str) -> Result<Submission, FalAiError> {
        if self.fail_all {
            return Err(FalAiError::Unavailable("connection refused".into()));
        }
        if prompt == "boom" {
            return Err(FalAiError::Rejected {
                status: 422,
                body: "unsafe prompt".into(),
            });
        }
        Ok(Submission {
            request_id: format!("img-{prompt}"),
            response_url: None,
        })
    }

    async fn fetch_generated_asset_sync(&self, _: &str) -> Result<String, FalAiError> {
        if self.fail_all {
            return Err(FalAiError::Unavailable("timed out".into()));
        }
        Ok("thumb.png".to_string())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(webhook_secret: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        webhook_secret: webhook_secret.map(str::to_string),
        reconcile_interval_secs: 300,
        placeholder_ttl_secs: 900,
        jwt: JwtConfig::with_secret(TEST_JWT_SECRET),
    }
}

fn test_uploads() -> UploadGateway {
    UploadGateway::new(&S3Config {
        access_key: "AKIDEXAMPLE".into(),
        secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
        endpoint: "https://storage.example.com".into(),
        bucket: "photoai-uploads".into(),
        region: "auto".into(),
    })
}

/// Build the full application with a well-behaved fake provider and no
/// webhook secret.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, FakeProvider::default(), None)
}

pub fn build_test_app_with(
    pool: PgPool,
    provider: FakeProvider,
    webhook_secret: Option<&str>,
) -> Router {
    let pipeline = JobCorrelator::new(pool.clone(), Arc::new(provider));
    let state = AppState {
        pool,
        config: Arc::new(test_config(webhook_secret)),
        pipeline: Arc::new(pipeline),
        uploads: Arc::new(test_uploads()),
    };
    build_app(state)
}

/// Mint a bearer token for `user_id`.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &JwtConfig::with_secret(TEST_JWT_SECRET))
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body with extra headers (webhook signatures).
pub async fn post_raw(app: Router, uri: &str, body: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Data helpers
// ---------------------------------------------------------------------------

pub fn training_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "type": "Woman",
        "age": 29,
        "ethinicity": "South Asian",
        "eyeColor": "Hazel",
        "bald": false,
        "zipUrl": "s3://x/a.zip",
    })
}

/// Train a model through the API and complete it by webhook. Returns the
/// model id.
pub async fn trained_model(app: &Router, token: &str) -> i64 {
    let response = post_json_auth(app.clone(), "/ai/training", training_body("Jane"), token).await;
    let model_id = body_json(response).await["modelId"].as_i64().unwrap();

    let models = body_json(get_auth(app.clone(), "/models", token).await).await;
    let request_id = models["models"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == model_id)
        .and_then(|m| m["falAiRequestId"].as_str())
        .unwrap()
        .to_string();

    let hook = serde_json::json!({ "request_id": request_id, "tensor_path": "path/a" });
    post_json(app.clone(), "/fal-ai/webhook/train", hook).await;
    model_id
}

pub async fn seed_pack(pool: &PgPool, prompts: &[&str]) -> i64 {
    let (pack_id,): (i64,) = sqlx::query_as(
        "INSERT INTO packs (name, description, image_url1, image_url2) \
         VALUES ('Office', 'Corporate headshots', 'https://cdn/p1.png', 'https://cdn/p2.png') \
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    for prompt in prompts {
        sqlx::query("INSERT INTO pack_prompts (pack_id, prompt) VALUES ($1, $2)")
            .bind(pack_id)
            .bind(prompt)
            .execute(pool)
            .await
            .unwrap();
    }
    pack_id
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}
