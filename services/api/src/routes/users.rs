//! User profile routes

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::user::{ProfilePatch, UserProfile},
    state::AppState,
};

/// Get a user's public profile
///
/// The stored account status is recomputed from the current profile state
/// on the way out and persisted when it advanced.
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let advanced = user
        .account_status
        .advanced(user.email_verified, user.name.is_some());

    if advanced != user.account_status {
        state
            .user_repository
            .set_account_status(user.id, advanced)
            .await
            .map_err(|e| {
                error!("Failed to persist account status: {}", e);
                ApiError::InternalServerError
            })?;
        user.account_status = advanced;
    }

    Ok(Json(UserProfile::from(user)))
}

/// Partially update the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(patch): Json<ProfilePatch>,
) -> Result<impl IntoResponse, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::Validation(
            "No fields to update provided".to_string(),
        ));
    }

    let mut user = state
        .user_repository
        .find_by_id(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    patch.apply(&mut user);

    let updated = state.user_repository.update_profile(&user).await.map_err(|e| {
        error!("Failed to update profile: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(UserProfile::from(updated)))
}
