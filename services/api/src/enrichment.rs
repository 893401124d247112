//! AI enrichment pass-through
//!
//! Story/image/music generation happens in an external service; this
//! client sends the memory's media reference and description over and
//! stores whatever comes back. The generation pipeline itself is opaque
//! to us.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Enrichment service configuration
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Base URL of the enrichment service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EnrichmentConfig {
    /// Create a new EnrichmentConfig from environment variables, or None
    /// when the service is not configured
    ///
    /// # Environment Variables
    /// - `ENRICHMENT_SERVICE_URL`: Base URL of the enrichment service
    /// - `ENRICHMENT_TIMEOUT`: Request timeout in seconds (default: 60)
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("ENRICHMENT_SERVICE_URL").ok()?;

        let timeout_secs = std::env::var("ENRICHMENT_TIMEOUT")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        Some(EnrichmentConfig {
            base_url,
            timeout_secs,
        })
    }
}

/// Request sent to the enrichment service
#[derive(Debug, Serialize)]
struct EnrichmentRequest<'a> {
    file_url: &'a str,
    description: Option<&'a str>,
    tags: &'a [String],
}

/// What the enrichment service produced for a memory
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentOutcome {
    pub story: Option<String>,
    pub image_url: Option<String>,
    pub music_url: Option<String>,
    pub context: Option<serde_json::Value>,
}

/// Enrichment service client
#[derive(Clone)]
pub struct EnrichmentClient {
    client: reqwest::Client,
    base_url: String,
}

impl EnrichmentClient {
    /// Initialize a new enrichment client
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(EnrichmentClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run enrichment for a memory's media and description
    pub async fn enrich(
        &self,
        file_url: &str,
        description: Option<&str>,
        tags: &[String],
    ) -> Result<EnrichmentOutcome> {
        let response = self
            .client
            .post(format!("{}/enrich", self.base_url))
            .json(&EnrichmentRequest {
                file_url,
                description,
                tags,
            })
            .send()
            .await?
            .error_for_status()?;

        let outcome = response.json().await?;
        Ok(outcome)
    }
}
