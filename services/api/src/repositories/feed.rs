//! Feed repository: ordered read-views over public memories
//!
//! Both feed modes only ever surface `is_public` rows; following a user
//! grants no access to their private memories. Rows come back enriched
//! with the author's display info and the materialized counters.

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::feed::FeedItem;

/// Feed repository for database operations
#[derive(Clone)]
pub struct FeedRepository {
    pool: PgPool,
}

impl FeedRepository {
    /// Create a new feed repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public feed: all public memories, newest first
    pub async fn public_feed(&self, limit: i64, offset: i64) -> Result<Vec<FeedItem>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.user_id, m.description, m.file_url, m.tags, m.is_public,
                   m.likes_count, m.comments_count, m.created_at,
                   u.name AS author_name, u.avatar_url AS author_avatar_url
            FROM memories m
            JOIN users u ON m.user_id = u.id
            WHERE m.is_public = TRUE
            ORDER BY m.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_item).collect())
    }

    /// Following feed: public memories authored by users the requester follows
    pub async fn following_feed(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.user_id, m.description, m.file_url, m.tags, m.is_public,
                   m.likes_count, m.comments_count, m.created_at,
                   u.name AS author_name, u.avatar_url AS author_avatar_url
            FROM memories m
            JOIN followers f ON m.user_id = f.user_id
            JOIN users u ON m.user_id = u.id
            WHERE f.follower_id = $1 AND m.is_public = TRUE
            ORDER BY m.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_item).collect())
    }
}

fn row_to_item(row: &PgRow) -> FeedItem {
    FeedItem {
        id: row.get("id"),
        user_id: row.get("user_id"),
        author_name: row.get("author_name"),
        author_avatar_url: row.get("author_avatar_url"),
        description: row.get("description"),
        file_url: row.get("file_url"),
        tags: row.get("tags"),
        is_public: row.get("is_public"),
        likes_count: row.get("likes_count"),
        comments_count: row.get("comments_count"),
        created_at: row.get("created_at"),
    }
}
