//! Like models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like entity, at most one per `(memory_id, user_id)` pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub memory_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Like joined with the liker's display information
#[derive(Debug, Clone, Serialize)]
pub struct LikeWithUser {
    pub memory_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_avatar_url: Option<String>,
}

/// Request to like or unlike a memory
#[derive(Debug, Clone, Deserialize)]
pub struct LikeRequest {
    pub memory_id: Uuid,
}
