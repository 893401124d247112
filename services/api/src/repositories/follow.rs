//! Follow repository for database operations
//!
//! The `(follower_id, user_id)` primary key is the authoritative guard
//! against duplicate edges; the check in [`crate::policy::check_follow`]
//! only exists to produce a friendly error ahead of the constraint.

use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::follow::{Follow, FollowListEntry};

/// Follow repository for database operations
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    /// Create a new follow repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether `follower_id` currently follows `user_id`
    pub async fn is_following(&self, follower_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM followers
                WHERE follower_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a follow edge
    ///
    /// Returns None when the edge already exists.
    pub async fn follow(&self, follower_id: Uuid, user_id: Uuid) -> Result<Option<Follow>> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO followers (follower_id, user_id)
            VALUES ($1, $2)
            RETURNING created_at
            "#,
        )
        .bind(follower_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(Some(Follow {
                follower_id,
                user_id,
                created_at: row.get("created_at"),
            })),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a follow edge
    ///
    /// Returns false when no edge existed.
    pub async fn unfollow(&self, follower_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM followers
            WHERE follower_id = $1 AND user_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List the users following `user_id`, newest edges first
    pub async fn followers(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowListEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.avatar_url, f.created_at AS followed_at
            FROM followers f
            JOIN users u ON f.follower_id = u.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    /// List the users `user_id` is following, newest edges first
    pub async fn following(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowListEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.avatar_url, f.created_at AS followed_at
            FROM followers f
            JOIN users u ON f.user_id = u.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }
}

fn row_to_entry(row: sqlx::postgres::PgRow) -> FollowListEntry {
    FollowListEntry {
        id: row.get("id"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        followed_at: row.get("followed_at"),
    }
}
