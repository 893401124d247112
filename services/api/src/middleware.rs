//! Authentication middleware for session token validation
//!
//! Tokens are issued by the auth service; this side only verifies them
//! with the shared HS256 secret and attaches the identity to the request.

use axum::{
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

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

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Token verifier configuration
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Shared HS256 secret, must match the auth service
    pub secret: String,
}

impl VerifierConfig {
    /// Create a new VerifierConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TOKEN_SECRET`: Shared HS256 signing secret
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("TOKEN_SECRET environment variable not set"))?;

        Ok(VerifierConfig { secret })
    }
}

/// Session token verifier
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Initialize a new token verifier
    pub fn new(config: &VerifierConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        TokenVerifier {
            decoding_key,
            validation,
        }
    }

    /// Validate a token and return the authenticated identity
    ///
    /// Expired, malformed, and tampered tokens are all rejected.
    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser {
            id: token_data.claims.sub,
        })
    }

    /// Resolve the requester identity from headers, if any
    ///
    /// Used by public routes where a bearer token is optional; an invalid
    /// token simply yields no identity instead of failing the request.
    pub fn identity_from_headers(&self, headers: &HeaderMap) -> Option<AuthUser> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())?
            .strip_prefix("Bearer ")?;

        self.verify(token).ok()
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Check if it's a Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let user = state.token_verifier.verify(token)?;

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    // Call the next service
    let response = next.run(req).await;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret-not-for-production";

    fn test_verifier() -> TokenVerifier {
        TokenVerifier::new(&VerifierConfig {
            secret: SECRET.to_string(),
        })
    }

    fn make_token(secret: &str, sub: Uuid, exp_offset: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = Claims {
            sub,
            email: "alice@example.com".to_string(),
            iat: now as u64,
            exp: (now + exp_offset) as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_accepts_valid_token() {
        let verifier = test_verifier();
        let sub = Uuid::new_v4();
        let token = make_token(SECRET, sub, 3600);

        let user = verifier.verify(&token).unwrap();
        assert_eq!(user.id, sub);
    }

    #[test]
    fn test_verify_rejects_expired_and_foreign_tokens() {
        let verifier = test_verifier();

        // Expired well past the default validation leeway.
        assert!(verifier.verify(&make_token(SECRET, Uuid::new_v4(), -3600)).is_err());
        assert!(
            verifier
                .verify(&make_token("other-secret", Uuid::new_v4(), 3600))
                .is_err()
        );
        assert!(verifier.verify("garbage").is_err());
    }

    #[test]
    fn test_identity_from_headers_is_optional() {
        let verifier = test_verifier();

        let empty = HeaderMap::new();
        assert!(verifier.identity_from_headers(&empty).is_none());

        let mut bad = HeaderMap::new();
        bad.insert(header::AUTHORIZATION, "Bearer garbage".parse().unwrap());
        assert!(verifier.identity_from_headers(&bad).is_none());

        let mut good = HeaderMap::new();
        let token = make_token(SECRET, Uuid::new_v4(), 3600);
        good.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        assert!(verifier.identity_from_headers(&good).is_some());
    }
}
