use std::time::Duration;

/// Default base URL of the fal queue API.
pub const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run";

/// Default base URL of the fal synchronous API.
pub const DEFAULT_SYNC_URL: &str = "https://fal.run";

/// fal.ai client configuration.
#[derive(Clone)]
pub struct FalAiConfig {
    pub api_key: String,
    pub queue_url: String,
    pub sync_url: String,
    /// Public base URL the provider calls back, without trailing slash.
    pub webhook_base_url: String,
    pub submit_timeout: Duration,
    pub sync_timeout: Duration,
}

impl FalAiConfig {
    /// Load from environment variables.
    ///
    /// | Env var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `FAL_KEY`                | required                |
    /// | `WEBHOOK_BASE_URL`       | required                |
    /// | `FAL_QUEUE_URL`          | `https://queue.fal.run` |
    /// | `FAL_SYNC_URL`           | `https://fal.run`       |
    /// | `FAL_SUBMIT_TIMEOUT_SECS`| `30`                    |
    /// | `FAL_SYNC_TIMEOUT_SECS`  | `90`                    |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or a timeout is not a number.
    pub fn from_env() -> Self {
        let api_key = std::env::var("FAL_KEY").expect("FAL_KEY must be set");
        let webhook_base_url = std::env::var("WEBHOOK_BASE_URL")
            .expect("WEBHOOK_BASE_URL must be set")
            .trim_end_matches('/')
            .to_string();

        let queue_url = std::env::var("FAL_QUEUE_URL")
            .unwrap_or_else(|_| DEFAULT_QUEUE_URL.into())
            .trim_end_matches('/')
            .to_string();
        let sync_url = std::env::var("FAL_SYNC_URL")
            .unwrap_or_else(|_| DEFAULT_SYNC_URL.into())
            .trim_end_matches('/')
            .to_string();

        let submit_timeout_secs: u64 = std::env::var("FAL_SUBMIT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("FAL_SUBMIT_TIMEOUT_SECS must be a valid u64");
        let sync_timeout_secs: u64 = std::env::var("FAL_SYNC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("FAL_SYNC_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            queue_url,
            sync_url,
            webhook_base_url,
            submit_timeout: Duration::from_secs(submit_timeout_secs),
            sync_timeout: Duration::from_secs(sync_timeout_secs),
        }
    }

    pub fn training_webhook_url(&self) -> String {
        format!("{}/fal-ai/webhook/train", self.webhook_base_url)
    }

    pub fn image_webhook_url(&self) -> String {
        format!("{}/fal-ai/webhook/image", self.webhook_base_url)
    }
}

impl std::fmt::Debug for FalAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalAiConfig")
            .field("api_key", &"<redacted>")
            .field("queue_url", &self.queue_url)
            .field("sync_url", &self.sync_url)
            .field("webhook_base_url", &self.webhook_base_url)
            .field("submit_timeout", &self.submit_timeout)
            .field("sync_timeout", &self.sync_timeout)
            .finish()
    }
}
