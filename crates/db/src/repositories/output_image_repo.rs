//! Repository for the `output_images` table.

use photoai_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::output_image::OutputImage;
use crate::models::status::ImageStatus;

/// Column list for `output_images` queries.
const COLUMNS: &str = "\
    id, user_id, model_id, prompt, fal_ai_request_id, image_url, status_id, \
    created_at, updated_at";

/// Provides CRUD operations for generated images.
pub struct OutputImageRepo;

impl OutputImageRepo {
    /// Insert a single placeholder row.
    pub async fn create_placeholder(
        pool: &PgPool,
        user_id: &str,
        model_id: DbId,
        prompt: &str,
    ) -> Result<OutputImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO output_images (user_id, model_id, prompt, image_url, status_id) \
             VALUES ($1, $2, $3, '', $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutputImage>(&query)
            .bind(user_id)
            .bind(model_id)
            .bind(prompt)
            .bind(ImageStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Insert one placeholder per prompt in a single transaction.
    ///
    /// The returned rows are in the same order as `prompts`.
    pub async fn create_placeholders(
        pool: &PgPool,
        user_id: &str,
        model_id: DbId,
        prompts: &[String],
    ) -> Result<Vec<OutputImage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO output_images (user_id, model_id, prompt, image_url, status_id) \
             VALUES ($1, $2, $3, '', $4) \
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let row = sqlx::query_as::<_, OutputImage>(&query)
                .bind(user_id)
                .bind(model_id)
                .bind(prompt)
                .bind(ImageStatus::Pending.id())
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    /// Record the provider request id on a placeholder. `None` if the row is
    /// gone or already carries a request id.
    pub async fn attach_request_id(
        pool: &PgPool,
        id: DbId,
        request_id: &str,
    ) -> Result<Option<OutputImage>, sqlx::Error> {
        let query = format!(
            "UPDATE output_images SET fal_ai_request_id = $2, updated_at = NOW() \
             WHERE id = $1 AND fal_ai_request_id IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutputImage>(&query)
            .bind(id)
            .bind(request_id)
            .fetch_optional(pool)
            .await
    }

    /// Attach request ids pairwise (`(row id, request id)`) in one
    /// transaction. Either every pair is applied or none is: a missing or
    /// already-attached row fails with `RowNotFound` and rolls back.
    pub async fn attach_request_ids(
        pool: &PgPool,
        pairs: &[(DbId, String)],
    ) -> Result<Vec<OutputImage>, sqlx::Error> {
        let query = format!(
            "UPDATE output_images SET fal_ai_request_id = $2, updated_at = NOW() \
             WHERE id = $1 AND fal_ai_request_id IS NULL \
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(pairs.len());
        for (id, request_id) in pairs {
            let row = sqlx::query_as::<_, OutputImage>(&query)
                .bind(id)
                .bind(request_id)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    /// Delete placeholders whose provider submission failed. Rows that
    /// already carry a request id are left alone.
    pub async fn discard_unsubmitted(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM output_images WHERE id = ANY($1) AND fal_ai_request_id IS NULL",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find the image carrying a provider request id.
    pub async fn find_by_request_id(
        pool: &PgPool,
        request_id: &str,
    ) -> Result<Option<OutputImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM output_images WHERE fal_ai_request_id = $1");
        sqlx::query_as::<_, OutputImage>(&query)
            .bind(request_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by its internal ID, placeholders included.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OutputImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM output_images WHERE id = $1");
        sqlx::query_as::<_, OutputImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply an image completion to every `Pending` image keyed by the
    /// provider request id. Returns the number of rows transitioned.
    pub async fn complete<'e, E: PgExecutor<'e>>(
        executor: E,
        request_id: &str,
        image_url: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE output_images \
             SET status_id = $2, image_url = $3, updated_at = NOW() \
             WHERE fal_ai_request_id = $1 AND status_id = $4",
        )
        .bind(request_id)
        .bind(ImageStatus::Generated.id())
        .bind(image_url)
        .bind(ImageStatus::Pending.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Page through a user's images, optionally restricted to an id set.
    ///
    /// Newest first. Placeholders are never listed.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        ids: Option<&[DbId]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OutputImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM output_images \
             WHERE user_id = $1 AND fal_ai_request_id IS NOT NULL \
               AND ($2::BIGINT[] IS NULL OR id = ANY($2)) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, OutputImage>(&query)
            .bind(user_id)
            .bind(ids.map(<[DbId]>::to_vec))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete placeholders created before `cutoff`, returning their ids.
    pub async fn delete_stale_placeholders(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "DELETE FROM output_images \
             WHERE fal_ai_request_id IS NULL AND created_at < $1 \
             RETURNING id",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }
}
