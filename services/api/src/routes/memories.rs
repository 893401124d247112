//! Memory routes: create, read, update, delete, privacy, listing, enrichment

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::memory::{
        CreateMemoryRequest, DeleteMemoryRequest, EnrichMemoryRequest, MemoryWithOwnership,
        PrivacyRequest, UpdateMemoryRequest,
    },
    policy,
    state::AppState,
};

/// Query parameters for the per-user memory listing
#[derive(Debug, Deserialize)]
pub struct UserMemoriesQuery {
    pub user_id: Uuid,
}

/// Create a new memory owned by the requester
pub async fn create_memory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMemoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.file_url.trim().is_empty() {
        return Err(ApiError::Validation("file_url is required".to_string()));
    }

    let memory = state
        .memory_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create memory: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(memory)))
}

/// Get a single memory, honoring visibility
///
/// The bearer token is optional here; it only matters for private rows.
/// A missing memory is 404 for everyone, an existing private one is 403
/// for non-owners, never the other way around.
pub async fn get_memory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let requester = state
        .token_verifier
        .identity_from_headers(&headers)
        .map(|user| user.id);

    let memory = state
        .memory_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    if !policy::can_read(requester, memory.user_id, memory.is_public) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(memory))
}

/// Partially update an owned memory
pub async fn update_memory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateMemoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut memory = state
        .memory_repository
        .find_by_id(payload.memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    if !policy::can_write(user.id, memory.user_id) {
        return Err(ApiError::Forbidden);
    }

    if payload.patch.is_empty() {
        return Err(ApiError::Validation(
            "No fields to update provided".to_string(),
        ));
    }

    payload.patch.validate().map_err(ApiError::Validation)?;

    payload.patch.apply(&mut memory);

    let updated = state.memory_repository.update(&memory).await.map_err(|e| {
        error!("Failed to update memory: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(updated))
}

/// Delete an owned memory
pub async fn delete_memory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DeleteMemoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let memory = state
        .memory_repository
        .find_by_id(payload.memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    if !policy::can_write(user.id, memory.user_id) {
        return Err(ApiError::Forbidden);
    }

    let deleted = state
        .memory_repository
        .delete(memory.id)
        .await
        .map_err(|e| {
            error!("Failed to delete memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    Ok(Json(deleted))
}

/// Set the privacy flag on an owned memory
///
/// The boolean is explicit in the request; there is no implicit flip.
pub async fn toggle_privacy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PrivacyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let memory = state
        .memory_repository
        .find_by_id(payload.memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    if !policy::can_write(user.id, memory.user_id) {
        return Err(ApiError::Forbidden);
    }

    let updated = state
        .memory_repository
        .set_privacy(memory.id, payload.is_public)
        .await
        .map_err(|e| {
            error!("Failed to update memory privacy: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    Ok(Json(updated))
}

/// List a user's memories with ownership flags
///
/// The owner sees everything; everyone else sees public rows only.
pub async fn list_memories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<UserMemoriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let include_private = user.id == query.user_id;

    let memories = state
        .memory_repository
        .list_for_user(query.user_id, include_private)
        .await
        .map_err(|e| {
            error!("Failed to list memories: {}", e);
            ApiError::InternalServerError
        })?;

    let response: Vec<MemoryWithOwnership> = memories
        .into_iter()
        .map(|memory| MemoryWithOwnership {
            is_owner: memory.user_id == user.id,
            memory,
        })
        .collect();

    Ok(Json(response))
}

/// Run AI enrichment on an owned memory and store the results
pub async fn enrich_memory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<EnrichMemoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let memory = state
        .memory_repository
        .find_by_id(payload.memory_id)
        .await
        .map_err(|e| {
            error!("Failed to load memory: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    if !policy::can_write(user.id, memory.user_id) {
        return Err(ApiError::Forbidden);
    }

    let client = state.enrichment.as_ref().ok_or_else(|| {
        error!("Enrichment requested but no enrichment service is configured");
        ApiError::InternalServerError
    })?;

    let outcome = client
        .enrich(&memory.file_url, memory.description.as_deref(), &memory.tags)
        .await
        .map_err(|e| {
            error!("Enrichment service call failed: {}", e);
            ApiError::InternalServerError
        })?;

    let updated = state
        .memory_repository
        .record_enrichment(memory.id, &outcome)
        .await
        .map_err(|e| {
            error!("Failed to store enrichment results: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;

    Ok(Json(updated))
}
