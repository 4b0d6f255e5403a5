//! Prompt packs. Curated outside this service; read-only here.

use photoai_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `packs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub image_url1: String,
    pub image_url2: String,
    pub created_at: Timestamp,
}

/// A row from the `pack_prompts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackPrompt {
    pub id: DbId,
    pub pack_id: DbId,
    pub prompt: String,
    pub created_at: Timestamp,
}
