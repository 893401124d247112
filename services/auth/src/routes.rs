//! Authentication service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    AppState,
    models::{NewUser, User},
    provider::ProviderError,
    validation::{validate_email, validate_password},
};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

/// Request carrying only an email address
#[derive(Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/verify-email/:email", get(check_email_verification))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Register a new user with the identity provider and mirror it locally
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    validate_email(&payload.email).map_err(AuthError::BadRequest)?;
    validate_password(&payload.password).map_err(AuthError::BadRequest)?;

    let identity = state
        .identity_provider
        .sign_up(&payload.email, &payload.password)
        .await?;

    let new_user = NewUser {
        id: identity.id,
        email: identity.email,
        name: payload.name,
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user mirror row: {}", e);
        AuthError::InternalServerError
    })?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Registration successful",
            "email": user.email,
        })),
    ))
}

/// Verify credentials with the provider and issue a session token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let identity = state
        .identity_provider
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| match e {
            ProviderError::Rejected(_) => AuthError::Unauthorized,
            ProviderError::Unavailable(msg) => {
                error!("Identity provider unavailable during login: {}", msg);
                AuthError::InternalServerError
            }
        })?;

    // The mirror row can be missing if registration happened directly with
    // the provider; create it on first login.
    let user = match state
        .user_repository
        .find_by_email(&identity.email)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            AuthError::InternalServerError
        })? {
        Some(user) => user,
        None => {
            let new_user = NewUser {
                id: identity.id,
                email: identity.email.clone(),
                name: None,
            };
            state.user_repository.create(&new_user).await.map_err(|e| {
                error!("Failed to create user mirror row: {}", e);
                AuthError::InternalServerError
            })?
        }
    };

    if identity.email_verified && !user.email_verified {
        state
            .user_repository
            .set_email_verified(&user.email, true)
            .await
            .map_err(|e| {
                error!("Failed to mirror email verification: {}", e);
                AuthError::InternalServerError
            })?;
    }

    let token = state.token_service.issue(user.id, &user.email).map_err(|e| {
        error!("Failed to issue session token: {}", e);
        AuthError::InternalServerError
    })?;

    let response = LoginResponse {
        token,
        user,
        expires_in: state.token_service.ttl_secs(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
///
/// Session tokens are stateless and simply expire; there is nothing to
/// revoke server-side.
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logout successful"})),
    )
}

/// Ask the identity provider to resend the verification email
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<impl IntoResponse, AuthError> {
    validate_email(&payload.email).map_err(AuthError::BadRequest)?;

    state
        .identity_provider
        .resend_verification(&payload.email)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Verification email sent",
            "email": payload.email,
        })),
    ))
}

/// Query the provider's verification state and mirror it locally
pub async fn check_email_verification(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AuthError> {
    validate_email(&email).map_err(AuthError::BadRequest)?;

    let verified = state.identity_provider.is_email_verified(&email).await?;

    state
        .user_repository
        .set_email_verified(&email, verified)
        .await
        .map_err(|e| {
            error!("Failed to mirror email verification: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({
        "email": email,
        "verified": verified,
    })))
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    BadRequest(String),
    InternalServerError,
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(msg) => AuthError::BadRequest(msg),
            ProviderError::Unavailable(msg) => {
                error!("Identity provider unavailable: {}", msg);
                AuthError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
