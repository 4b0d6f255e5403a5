//! Repository for the `parked_completions` table.

use photoai_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::completion::{JobKind, ParkedCompletion};

const COLUMNS: &str = "id, job_kind, request_id, result, received_at, claimed_at";

/// Stores and claims completions that arrived before their row was keyed.
///
/// Claiming happens inside the caller's transaction: lock, apply, then
/// mark claimed and commit, or roll back to leave the completion parked.
pub struct CompletionRepo;

impl CompletionRepo {
    /// Park a completion. Redelivery of the same `(kind, request_id)` keeps
    /// the first payload and returns `false`.
    pub async fn park(
        pool: &PgPool,
        kind: JobKind,
        request_id: &str,
        result: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let outcome = sqlx::query(
            "INSERT INTO parked_completions (job_kind, request_id, result) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_parked_completions_kind_request DO NOTHING",
        )
        .bind(kind.as_str())
        .bind(request_id)
        .bind(result)
        .execute(pool)
        .await?;
        Ok(outcome.rows_affected() > 0)
    }

    /// Lock an unclaimed parked completion for the rest of the caller's
    /// transaction.
    ///
    /// A concurrent caller for the same `(kind, request_id)` waits until the
    /// holder commits or rolls back, then sees the row only if it is still
    /// unclaimed.
    pub async fn lock_unclaimed(
        conn: &mut PgConnection,
        kind: JobKind,
        request_id: &str,
    ) -> Result<Option<ParkedCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parked_completions \
             WHERE job_kind = $1 AND request_id = $2 AND claimed_at IS NULL \
             FOR UPDATE"
        );
        sqlx::query_as::<_, ParkedCompletion>(&query)
            .bind(kind.as_str())
            .bind(request_id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a locked completion as applied.
    pub async fn mark_claimed(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE parked_completions SET claimed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Unclaimed completions received before `cutoff`, oldest first.
    pub async fn list_unclaimed_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<ParkedCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parked_completions \
             WHERE claimed_at IS NULL AND received_at < $1 \
             ORDER BY received_at ASC"
        );
        sqlx::query_as::<_, ParkedCompletion>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }
}
