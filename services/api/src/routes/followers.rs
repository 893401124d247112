//! Social graph routes: follow, unfollow, follower/following listings

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{PageQuery, follow::FollowRequest},
    policy::{self, FollowCheck},
    state::AppState,
};

/// Follow a user
pub async fn follow_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<FollowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target_exists = state
        .user_repository
        .exists(payload.user_id)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if !target_exists {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let already_following = state
        .follow_repository
        .is_following(user.id, payload.user_id)
        .await
        .map_err(|e| {
            error!("Failed to check follow state: {}", e);
            ApiError::InternalServerError
        })?;

    match policy::check_follow(user.id, payload.user_id, already_following) {
        FollowCheck::SelfFollow => {
            return Err(ApiError::Validation(
                "You cannot follow yourself".to_string(),
            ));
        }
        FollowCheck::AlreadyFollowing => {
            return Err(ApiError::Conflict(
                "Already following this user".to_string(),
            ));
        }
        FollowCheck::Allowed => {}
    }

    // The unique constraint is the authoritative guard; a race past the
    // check above still lands here as a conflict.
    let follow = state
        .follow_repository
        .follow(user.id, payload.user_id)
        .await
        .map_err(|e| {
            error!("Failed to follow user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Conflict("Already following this user".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Successfully followed user",
            "follow": follow,
        })),
    ))
}

/// Unfollow a user
pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<FollowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .follow_repository
        .unfollow(user.id, payload.user_id)
        .await
        .map_err(|e| {
            error!("Failed to unfollow user: {}", e);
            ApiError::InternalServerError
        })?;

    if !removed {
        return Err(ApiError::NotFound(
            "Follow relationship not found".to_string(),
        ));
    }

    Ok(Json(json!({"message": "Successfully unfollowed user"})))
}

/// List a user's followers
pub async fn list_followers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = page.resolve().map_err(ApiError::Validation)?;

    let followers = state
        .follow_repository
        .followers(user_id, limit, offset)
        .await
        .map_err(|e| {
            error!("Failed to list followers: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(followers))
}

/// List the users a user is following
pub async fn list_following(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = page.resolve().map_err(ApiError::Validation)?;

    let following = state
        .follow_repository
        .following(user_id, limit, offset)
        .await
        .map_err(|e| {
            error!("Failed to list following: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(following))
}
