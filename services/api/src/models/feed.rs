//! Feed models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feed mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    /// All public memories
    Public,
    /// Public memories authored by users the requester follows
    Following,
}

impl FeedType {
    /// Parse the `type` query parameter; `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(FeedType::Public),
            "following" => Some(FeedType::Following),
            _ => None,
        }
    }
}

/// Query parameters for the feed endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    /// Feed mode, `public` (default) or `following`
    #[serde(rename = "type")]
    pub feed_type: Option<String>,
    /// Requester id; required for the following feed
    pub user_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A feed row: memory enriched with author display info and counters
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub description: Option<String>,
    pub file_url: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_type_parse() {
        assert_eq!(FeedType::parse("public"), Some(FeedType::Public));
        assert_eq!(FeedType::parse("following"), Some(FeedType::Following));
        assert_eq!(FeedType::parse("friends"), None);
        assert_eq!(FeedType::parse(""), None);
    }
}
