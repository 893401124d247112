//! Like routes

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError, middleware::AuthUser, models::like::LikeRequest, policy, state::AppState,
};

/// Like a memory
///
/// The second like by the same user is a 409; the counter and the like
/// row move together inside the repository's transaction.
pub async fn like_memory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Existence first: liking a missing memory is 404, never a conflict.
    state
        .memory_repository
        .find_by_id(payload.memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    let like = state
        .like_repository
        .like(payload.memory_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to like memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Conflict("User has already liked this memory".to_string()))?;

    Ok((StatusCode::CREATED, Json(like)))
}

/// Unlike a memory
pub async fn unlike_memory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .like_repository
        .unlike(payload.memory_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to unlike memory: {}", e);
            ApiError::InternalServerError
        })?;

    if !removed {
        return Err(ApiError::NotFound("Like not found".to_string()));
    }

    Ok(Json(json!({"message": "Memory unliked successfully"})))
}

/// List a memory's likes with liker display info
///
/// Visibility follows the parent memory: likes of a private memory are
/// only listable by its owner.
pub async fn list_likes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(memory_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let requester = state
        .token_verifier
        .identity_from_headers(&headers)
        .map(|user| user.id);

    let memory = state
        .memory_repository
        .find_by_id(memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    if !policy::can_read(requester, memory.user_id, memory.is_public) {
        return Err(ApiError::Forbidden);
    }

    let likes = state
        .like_repository
        .list_for_memory(memory_id)
        .await
        .map_err(|e| {
            error!("Failed to list likes: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(likes))
}
