//! Comment models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub memory_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with the author's display information
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub memory_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_avatar_url: Option<String>,
}

/// Request to add a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub memory_id: Uuid,
    pub content: String,
}

/// Request to delete a comment
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteCommentRequest {
    pub comment_id: Uuid,
}
