//! Object storage gateway.
//!
//! Hands out presigned PUT URLs so clients upload training archives
//! straight to the S3-compatible bucket. The service itself never touches
//! archive bytes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;

/// Lifetime of a presigned upload URL.
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(300);

/// Content type the presigned PUT is bound to.
pub const UPLOAD_CONTENT_TYPE: &str = "application/zip";

/// Key prefix for uploaded training archives.
pub const UPLOAD_KEY_PREFIX: &str = "models/";

const KEY_SUFFIX_LEN: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid presigning configuration: {0}")]
    Config(String),

    #[error("Failed to presign upload: {0}")]
    Presign(String),
}

/// Connection settings for the S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
}

impl S3Config {
    /// Load from environment variables.
    ///
    /// | Env var         | Default  |
    /// |-----------------|----------|
    /// | `S3_ACCESS_KEY` | required |
    /// | `S3_SECRET_KEY` | required |
    /// | `S3_ENDPOINT`   | required |
    /// | `S3_BUCKET`     | required |
    /// | `S3_REGION`     | `auto`   |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing.
    pub fn from_env() -> Self {
        let required =
            |name: &str| std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
        Self {
            access_key: required("S3_ACCESS_KEY"),
            secret_key: required("S3_SECRET_KEY"),
            endpoint: required("S3_ENDPOINT"),
            bucket: required("S3_BUCKET"),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "auto".into()),
        }
    }
}

/// A presigned upload target returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUpload {
    pub url: String,
    pub key: String,
}

/// Issues presigned upload URLs against one bucket.
pub struct UploadGateway {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl UploadGateway {
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "photoai-env",
        );
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Presign a PUT for a freshly generated archive key.
    pub async fn presign_upload(&self) -> Result<PresignedUpload, StorageError> {
        let key = generate_upload_key();
        let presigning = PresigningConfig::expires_in(UPLOAD_URL_TTL)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(UPLOAD_CONTENT_TYPE)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        tracing::debug!(key = %key, "Presigned upload URL issued");

        Ok(PresignedUpload {
            url: request.uri().to_string(),
            key,
        })
    }
}

/// Build `models/<unix_millis>_<random suffix>.zip`.
pub fn generate_upload_key() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{UPLOAD_KEY_PREFIX}{millis}_{suffix}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> S3Config {
        S3Config {
            access_key: "AKIDEXAMPLE".into(),
            secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
            endpoint: "https://storage.example.com".into(),
            bucket: "photoai-uploads".into(),
            region: "auto".into(),
        }
    }

    fn assert_key_shape(key: &str) {
        let rest = key
            .strip_prefix(UPLOAD_KEY_PREFIX)
            .and_then(|k| k.strip_suffix(".zip"))
            .unwrap_or_else(|| panic!("unexpected key shape: {key}"));
        let (millis, suffix) = rest.split_once('_').expect("missing separator");
        assert!(millis.parse::<u128>().is_ok(), "millis not numeric: {millis}");
        assert_eq!(suffix.len(), KEY_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_keys_have_expected_shape() {
        assert_key_shape(&generate_upload_key());
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(generate_upload_key(), generate_upload_key());
    }

    #[tokio::test]
    async fn presigned_url_targets_bucket_and_expires_in_five_minutes() {
        let gateway = UploadGateway::new(&test_config());
        let upload = gateway.presign_upload().await.unwrap();

        assert_key_shape(&upload.key);
        assert!(upload.url.starts_with("https://storage.example.com/photoai-uploads/models/"));
        assert!(upload.url.contains(&upload.key));
        assert!(upload.url.contains("X-Amz-Expires=300"));
        assert!(upload.url.contains("X-Amz-Signature="));
    }
}
