//! Identity provider client
//!
//! Credential issuance and email verification are delegated to an external
//! identity provider. This module is the single place that talks to it; the
//! rest of the application only sees verified identities and the
//! `is_email_verified` answer, never provider internals.
//!
//! The wire contract is intentionally small:
//! - `POST {base}/signup {email, password}` -> identity
//! - `POST {base}/token {email, password}` -> identity
//! - `POST {base}/resend {email}` -> 2xx
//! - `GET {base}/verify?email=...` -> `{"verified": bool}`

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Identity provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the identity provider API
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Create a new ProviderConfig from environment variables
    ///
    /// # Environment Variables
    /// - `IDENTITY_PROVIDER_URL`: Base URL of the provider API
    /// - `IDENTITY_PROVIDER_KEY`: API key for the provider
    /// - `IDENTITY_PROVIDER_TIMEOUT`: Request timeout in seconds (default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("IDENTITY_PROVIDER_URL")
            .map_err(|_| anyhow::anyhow!("IDENTITY_PROVIDER_URL environment variable not set"))?;

        let api_key = std::env::var("IDENTITY_PROVIDER_KEY")
            .map_err(|_| anyhow::anyhow!("IDENTITY_PROVIDER_KEY environment variable not set"))?;

        let timeout_secs = std::env::var("IDENTITY_PROVIDER_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(ProviderConfig {
            base_url,
            api_key,
            timeout_secs,
        })
    }
}

/// Verified identity as returned by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIdentity {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Deserialize)]
struct VerificationStatus {
    verified: bool,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Errors surfaced by the identity provider client
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider rejected the request (bad credentials, duplicate email, ...)
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),

    /// The provider could not be reached or answered with a server error
    #[error("identity provider request failed: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Identity provider client
#[derive(Clone)]
pub struct IdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityProvider {
    /// Initialize a new identity provider client
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(IdentityProvider {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Register a new account with the provider
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, ProviderError> {
        info!("Registering account with identity provider: {}", email);

        let response = self
            .client
            .post(format!("{}/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::into_identity(response).await
    }

    /// Verify credentials with the provider and return the identity
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, ProviderError> {
        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::into_identity(response).await
    }

    /// Ask the provider to resend the verification email
    pub async fn resend_verification(&self, email: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(format!("{}/resend", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }

    /// Check whether the provider has verified the given email
    pub async fn is_email_verified(&self, email: &str) -> Result<bool, ProviderError> {
        let response = self
            .client
            .get(format!("{}/verify", self.base_url))
            .header("apikey", &self.api_key)
            .query(&[("email", email)])
            .send()
            .await?;

        if response.status().is_success() {
            let status: VerificationStatus = response.json().await?;
            Ok(status.verified)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn into_identity(response: reqwest::Response) -> Result<ProviderIdentity, ProviderError> {
        if response.status().is_success() {
            let identity: ProviderIdentity = response.json().await?;
            Ok(identity)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn status_error(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let detail = response
            .json::<ProviderErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.message))
            .unwrap_or_else(|| status.to_string());

        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            ProviderError::Rejected(detail)
        } else {
            ProviderError::Unavailable(detail)
        }
    }
}
