//! Comment routes

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
    error::ApiError,
    middleware::AuthUser,
    models::comment::{CreateCommentRequest, DeleteCommentRequest},
    policy,
    state::AppState,
};

/// Add a comment to a memory
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("content is required".to_string()));
    }

    state
        .memory_repository
        .find_by_id(payload.memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    let comment = state
        .comment_repository
        .add(payload.memory_id, user.id, &payload.content)
        .await
        .map_err(|e| {
            error!("Failed to add comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment (author-only)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DeleteCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .comment_repository
        .find_by_id(payload.comment_id)
        .await
        .map_err(|e| {
            error!("Failed to load comment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if !policy::can_write(user.id, comment.user_id) {
        return Err(ApiError::Forbidden);
    }

    let deleted = state
        .comment_repository
        .delete(comment.id)
        .await
        .map_err(|e| {
            error!("Failed to delete comment: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    Ok(Json(json!({"message": "Comment deleted successfully"})))
}

/// List a memory's comments with author display info
///
/// Visibility follows the parent memory: comments on a private memory
/// are only listable by its owner.
pub async fn list_comments(
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

    let comments = state
        .comment_repository
        .list_for_memory(memory_id)
        .await
        .map_err(|e| {
            error!("Failed to list comments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(comments))
}
