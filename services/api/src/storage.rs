//! Object storage pass-through
//!
//! Media bytes never flow through this service; clients upload and
//! download directly against S3 with short-lived presigned URLs minted
//! here. Upload keys are prefixed with the requesting user's id.

use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_s3::presigning::PresigningConfig;
use std::env;
use std::time::Duration;
use tracing::info;

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket holding user media
    pub bucket: String,
    /// Presigned URL validity in seconds
    pub url_ttl_secs: u64,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MEDIA_BUCKET_NAME`: S3 bucket for user media (default: "media-bucket")
    /// - `STORAGE_URL_TTL_SECS`: Presigned URL validity in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let bucket = env::var("MEDIA_BUCKET_NAME").unwrap_or_else(|_| "media-bucket".to_string());

        let url_ttl_secs = env::var("STORAGE_URL_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        Ok(StorageConfig {
            bucket,
            url_ttl_secs,
        })
    }
}

/// Presigned-URL client over the media bucket
#[derive(Clone)]
pub struct StorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_ttl: Duration,
}

impl StorageClient {
    /// Initialize a new storage client from the ambient AWS configuration
    pub async fn new(config: &StorageConfig) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&aws_config);

        info!("Storage client initialized for bucket: {}", config.bucket);

        StorageClient {
            client,
            bucket: config.bucket.clone(),
            url_ttl: Duration::from_secs(config.url_ttl_secs),
        }
    }

    /// Mint a presigned PUT URL for the given key and content type
    pub async fn upload_url(&self, key: &str, content_type: &str) -> Result<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(PresigningConfig::expires_in(self.url_ttl)?)
            .await?;

        Ok(presigned.uri().to_string())
    }

    /// Mint a presigned GET URL for the given key
    pub async fn download_url(&self, key: &str) -> Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(self.url_ttl)?)
            .await?;

        Ok(presigned.uri().to_string())
    }
}
