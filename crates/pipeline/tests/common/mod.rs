//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use photoai_core::subject::{Ethnicity, EyeColor, ModelType};
use photoai_db::models::model::TrainModelRequest;
use photoai_falai::{AiProvider, FalAiError, Submission};
use photoai_pipeline::JobCorrelator;
use sqlx::PgPool;

/// Scriptable in-memory provider.
///
/// Training request ids are `train-<n>`; generation request ids are
/// `img-<prompt>` so batch alignment is checkable. A prompt starting with
/// `slow` answers after a short delay and the prompt `boom` is rejected.
#[derive(Default)]
pub struct FakeProvider {
    pub trainings: AtomicUsize,
    pub fail_training: bool,
    pub fail_thumbnail: bool,
    pub thumbnail_url: Option<String>,
    pub generations: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn generation_count(&self) -> usize {
        self.generations.lock().unwrap().len()
    }
}

#[async_trait]
impl AiProvider for FakeProvider {
    async fn submit_training(
        &self,
        _source_archive_url: &str,
        _job_name: &str,
    ) -> Result<Submission, FalAiError> {
        if self.fail_training {
            return Err(FalAiError::Unavailable("connection refused".into()));
        }
        let n = self.trainings.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Submission {
            request_id: format!("train-{n}"),
            response_url: None,
        })
    }

    async fn submit_generation(
        &self,
        prompt: &str,
        _trained_asset_ref: &str,
    ) -> Result<Submission, FalAiError> {
        if prompt.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if prompt == "boom" {
            return Err(FalAiError::Rejected {
                status: 422,
                body: "unsafe prompt".into(),
            });
        }
        self.generations.lock().unwrap().push(prompt.to_string());
        Ok(Submission {
            request_id: format!("img-{prompt}"),
            response_url: None,
        })
    }

    async fn fetch_generated_asset_sync(&self, _asset_ref: &str) -> Result<String, FalAiError> {
        if self.fail_thumbnail {
            return Err(FalAiError::Unavailable("timed out".into()));
        }
        Ok(self
            .thumbnail_url
            .clone()
            .unwrap_or_else(|| "thumb.png".to_string()))
    }
}

pub fn correlator(pool: &PgPool, provider: FakeProvider) -> (JobCorrelator, Arc<FakeProvider>) {
    let provider = Arc::new(provider);
    (JobCorrelator::new(pool.clone(), provider.clone()), provider)
}

pub fn train_request(name: &str) -> TrainModelRequest {
    TrainModelRequest {
        name: name.to_string(),
        model_type: ModelType::Woman,
        age: 29,
        ethnicity: Ethnicity::SouthAsian,
        eye_color: EyeColor::Hazel,
        bald: false,
        zip_url: "s3://x/a.zip".to_string(),
    }
}

/// Submit and complete a training, returning the model id.
pub async fn trained_model(correlator: &JobCorrelator, user_id: &str) -> i64 {
    let model = correlator
        .submit_training(user_id, &train_request("Jane"))
        .await
        .unwrap();
    let request_id = model.fal_ai_request_id.clone().unwrap();
    correlator
        .complete_training(&request_id, "path/a")
        .await
        .unwrap();
    model.id
}

pub async fn seed_pack(pool: &PgPool, prompts: &[&str]) -> i64 {
    let (pack_id,): (i64,) = sqlx::query_as(
        "INSERT INTO packs (name, description) VALUES ('Headshots', 'Studio') RETURNING id",
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
