//! Follow edge models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed follow edge: `follower_id` follows `user_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request to follow or unfollow a user
#[derive(Debug, Clone, Deserialize)]
pub struct FollowRequest {
    pub user_id: Uuid,
}

/// Entry in a followers/following listing
#[derive(Debug, Clone, Serialize)]
pub struct FollowListEntry {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub followed_at: DateTime<Utc>,
}
