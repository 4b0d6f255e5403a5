//! Parked provider completions.
//!
//! A webhook whose request id matches no row at delivery time is stored here
//! instead of being dropped. Submission claims it once the request id is
//! attached to its row; whatever stays unclaimed is a lost webhook.

use photoai_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Which kind of provider job a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Training,
    Image,
}

impl JobKind {
    /// Value stored in `parked_completions.job_kind`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Image => "image",
        }
    }
}

/// A row from the `parked_completions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkedCompletion {
    pub id: DbId,
    pub job_kind: String,
    pub request_id: String,
    /// Result fields as delivered, e.g. `{"tensor_path": .., "thumbnail": ..}`
    /// or `{"image_url": ..}`.
    pub result: serde_json::Value,
    pub received_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
}
