//! Repository for the `models` table.
//!
//! Status literals always go through [`TrainingStatus`]; the completion
//! update only ever moves a row from `Pending` to `Generated`.

use photoai_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::model::{Model, TrainModelRequest};
use crate::models::status::TrainingStatus;

/// Column list for `models` queries.
const COLUMNS: &str = "\
    id, user_id, name, model_type, age, ethnicity, eye_color, bald, zip_url, \
    fal_ai_request_id, training_status_id, tensor_path, thumbnail, is_open, \
    created_at, updated_at";

/// Provides CRUD operations for trained models.
pub struct ModelRepo;

impl ModelRepo {
    /// Insert a placeholder row: status `Pending`, no provider request id.
    pub async fn create_placeholder(
        pool: &PgPool,
        user_id: &str,
        input: &TrainModelRequest,
    ) -> Result<Model, sqlx::Error> {
        let query = format!(
            "INSERT INTO models \
                (user_id, name, model_type, age, ethnicity, eye_color, bald, zip_url, \
                 training_status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(input.model_type.as_str())
            .bind(input.age)
            .bind(input.ethnicity.as_str())
            .bind(input.eye_color.as_str())
            .bind(input.bald)
            .bind(&input.zip_url)
            .bind(TrainingStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Record the provider request id on a placeholder.
    ///
    /// Returns `None` if the row is gone or already carries a request id;
    /// a stored request id is never overwritten.
    pub async fn attach_request_id(
        pool: &PgPool,
        id: DbId,
        request_id: &str,
    ) -> Result<Option<Model>, sqlx::Error> {
        let query = format!(
            "UPDATE models SET fal_ai_request_id = $2, updated_at = NOW() \
             WHERE id = $1 AND fal_ai_request_id IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .bind(request_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a placeholder whose provider submission failed.
    ///
    /// Rows that already carry a request id are left alone.
    pub async fn discard_unsubmitted(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM models WHERE id = $1 AND fal_ai_request_id IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a model by its internal ID, placeholders included.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Model>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM models WHERE id = $1");
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a model the user may generate against: owned by the user or
    /// open, submitted, and with a trained asset.
    pub async fn find_ready_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: &str,
    ) -> Result<Option<Model>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM models \
             WHERE id = $1 AND (user_id = $2 OR is_open) \
               AND fal_ai_request_id IS NOT NULL AND tensor_path IS NOT NULL"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the model carrying a provider request id.
    pub async fn find_by_request_id(
        pool: &PgPool,
        request_id: &str,
    ) -> Result<Option<Model>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM models WHERE fal_ai_request_id = $1");
        sqlx::query_as::<_, Model>(&query)
            .bind(request_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a training completion to every `Pending` model keyed by the
    /// provider request id. Returns the number of rows transitioned.
    pub async fn complete_training<'e, E: PgExecutor<'e>>(
        executor: E,
        request_id: &str,
        tensor_path: &str,
        thumbnail: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE models \
             SET training_status_id = $2, tensor_path = $3, thumbnail = $4, updated_at = NOW() \
             WHERE fal_ai_request_id = $1 AND training_status_id = $5",
        )
        .bind(request_id)
        .bind(TrainingStatus::Generated.id())
        .bind(tensor_path)
        .bind(thumbnail)
        .bind(TrainingStatus::Pending.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// List models visible to a user: their own plus every open model.
    ///
    /// A single `OR` predicate, so a model that is both owned and open
    /// appears once.
    pub async fn list_visible(pool: &PgPool, user_id: &str) -> Result<Vec<Model>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM models \
             WHERE (user_id = $1 OR is_open) AND fal_ai_request_id IS NOT NULL \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete placeholders created before `cutoff`, returning their ids.
    pub async fn delete_stale_placeholders(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "DELETE FROM models \
             WHERE fal_ai_request_id IS NULL AND created_at < $1 \
             RETURNING id",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }
}
