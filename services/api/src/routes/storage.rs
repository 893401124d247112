//! Presigned storage URL routes

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{error::ApiError, middleware::AuthUser, state::AppState};

/// Request body for an upload URL
#[derive(Debug, Deserialize)]
pub struct UploadUrlRequest {
    pub key: String,
    pub content_type: String,
}

/// Request body for a download URL
#[derive(Debug, Deserialize)]
pub struct DownloadUrlRequest {
    pub key: String,
}

/// Mint a presigned upload URL
///
/// The object key is always prefixed with the requester's id, so users
/// cannot write into each other's prefixes.
pub async fn upload_url(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UploadUrlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.key.trim().is_empty() {
        return Err(ApiError::Validation("key is required".to_string()));
    }
    if payload.content_type.trim().is_empty() {
        return Err(ApiError::Validation("content_type is required".to_string()));
    }

    let key = format!("{}/{}", user.id, payload.key);

    let url = state
        .storage
        .upload_url(&key, &payload.content_type)
        .await
        .map_err(|e| {
            error!("Failed to presign upload URL: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"uploadUrl": url, "key": key})))
}

/// Mint a presigned download URL
pub async fn download_url(
    State(state): State<AppState>,
    Json(payload): Json<DownloadUrlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.key.trim().is_empty() {
        return Err(ApiError::Validation("key is required".to_string()));
    }

    let url = state.storage.download_url(&payload.key).await.map_err(|e| {
        error!("Failed to presign download URL: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"downloadUrl": url})))
}
