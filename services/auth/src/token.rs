//! Token service for session token generation and validation
//!
//! This module issues the signed, time-limited session tokens that bind a
//! `(user_id, email)` pair. Tokens are HS256-signed JWTs with a 24-hour
//! validity window by default; the api service validates them with the
//! same shared secret.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Token validity window in seconds (default: 24 hours)
    pub ttl_secs: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TOKEN_SECRET`: Shared HS256 signing secret
    /// - `TOKEN_TTL_SECS`: Token validity in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("TOKEN_SECRET environment variable not set"))?;

        let ttl_secs = std::env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string()) // 24 hours
            .parse()
            .unwrap_or(86400);

        Ok(TokenConfig { secret, ttl_secs })
    }
}

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Email bound to the session
    pub email: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            ttl_secs: config.ttl_secs,
        }
    }

    /// Issue a session token binding the given user id and email
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    ///
    /// Expired, malformed, and tampered tokens are all rejected.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token validity window in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&TokenConfig {
            secret: "test-secret-not-for-production".to_string(),
            ttl_secs: 86400,
        })
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "alice@example.com").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_service();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Expired well past the default validation leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-not-for-production"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let service = test_service();
        assert!(service.validate("not-a-token").is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let service = test_service();
        let other = TokenService::new(&TokenConfig {
            secret: "another-secret".to_string(),
            ttl_secs: 86400,
        });

        let token = other.issue(Uuid::new_v4(), "mallory@example.com").unwrap();
        assert!(service.validate(&token).is_err());
    }
}
