//! Concurrent batch submission.

use futures::future::try_join_all;
use photoai_falai::{AiProvider, FalAiError, Submission};

/// Submit one generation per prompt concurrently.
///
/// The i-th submission in the result belongs to the i-th prompt whatever
/// order the provider answers in. The first failure is returned and the
/// submissions still in flight are dropped.
pub async fn submit_generations<P>(
    provider: &P,
    prompts: &[String],
    trained_asset_ref: &str,
) -> Result<Vec<Submission>, FalAiError>
where
    P: AiProvider + ?Sized,
{
    try_join_all(
        prompts
            .iter()
            .map(|prompt| provider.submit_generation(prompt, trained_asset_ref)),
    )
    .await
}
