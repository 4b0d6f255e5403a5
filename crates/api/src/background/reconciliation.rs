//! Periodic reconciliation of the submission/completion gap.
//!
//! A placeholder that never received its provider request id (the process
//! died between the provider call and the attach) is deleted and reported
//! as an orphaned submission. A parked completion nobody claimed within the
//! same window is reported as a lost webhook.

use std::time::Duration;

use chrono::Utc;
use photoai_core::types::DbId;
use photoai_db::repositories::{CompletionRepo, ModelRepo, OutputImageRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// What one reconciliation pass found.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub orphaned_models: Vec<DbId>,
    pub orphaned_images: Vec<DbId>,
    pub lost_webhooks: usize,
}

/// Run one pass with placeholders and parked completions older than `ttl`.
pub async fn reconcile_once(pool: &PgPool, ttl: Duration) -> Result<ReconcileReport, sqlx::Error> {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52));
    let cutoff = Utc::now() - ttl;

    let orphaned_models = ModelRepo::delete_stale_placeholders(pool, cutoff).await?;
    if !orphaned_models.is_empty() {
        tracing::warn!(
            ids = ?orphaned_models,
            "Reconciliation: removed orphaned model submissions",
        );
    }

    let orphaned_images = OutputImageRepo::delete_stale_placeholders(pool, cutoff).await?;
    if !orphaned_images.is_empty() {
        tracing::warn!(
            ids = ?orphaned_images,
            "Reconciliation: removed orphaned image submissions",
        );
    }

    let lost = CompletionRepo::list_unclaimed_before(pool, cutoff).await?;
    for parked in &lost {
        tracing::warn!(
            job_kind = %parked.job_kind,
            request_id = %parked.request_id,
            received_at = %parked.received_at,
            "Reconciliation: webhook never matched a submission",
        );
    }

    Ok(ReconcileReport {
        orphaned_models,
        orphaned_images,
        lost_webhooks: lost.len(),
    })
}

/// Run the reconciliation loop every `interval` until `cancel` fires.
pub async fn run(pool: PgPool, interval: Duration, ttl: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        ttl_secs = ttl.as_secs(),
        "Reconciliation job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reconciliation job stopping");
                break;
            }
            _ = ticker.tick() => {
                match reconcile_once(&pool, ttl).await {
                    Ok(report) if report == ReconcileReport::default() => {
                        tracing::debug!("Reconciliation: nothing to do");
                    }
                    Ok(report) => {
                        tracing::info!(
                            orphaned_models = report.orphaned_models.len(),
                            orphaned_images = report.orphaned_images.len(),
                            lost_webhooks = report.lost_webhooks,
                            "Reconciliation pass finished",
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reconciliation: pass failed");
                    }
                }
            }
        }
    }
}
