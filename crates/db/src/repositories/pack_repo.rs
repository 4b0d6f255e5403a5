//! Repository for the `packs` and `pack_prompts` tables.

use photoai_core::types::DbId;
use sqlx::PgPool;

use crate::models::pack::{Pack, PackPrompt};

const COLUMNS: &str = "id, name, description, image_url1, image_url2, created_at";

const PROMPT_COLUMNS: &str = "id, pack_id, prompt, created_at";

/// Read-only access to prompt packs.
pub struct PackRepo;

impl PackRepo {
    /// List all packs, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Pack>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM packs ORDER BY id ASC");
        sqlx::query_as::<_, Pack>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Pack>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM packs WHERE id = $1");
        sqlx::query_as::<_, Pack>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Prompts of a pack in insertion order.
    pub async fn list_prompts(
        pool: &PgPool,
        pack_id: DbId,
    ) -> Result<Vec<PackPrompt>, sqlx::Error> {
        let query = format!(
            "SELECT {PROMPT_COLUMNS} FROM pack_prompts WHERE pack_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, PackPrompt>(&query)
            .bind(pack_id)
            .fetch_all(pool)
            .await
    }
}
