//! Like repository for database operations
//!
//! The `(memory_id, user_id)` primary key is the authoritative guard
//! against duplicate likes; two requests racing past any application-level
//! check still cannot both insert. The counter update commits or rolls
//! back together with the row.

use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::like::{Like, LikeWithUser};

/// Like repository for database operations
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    /// Create a new like repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Like a memory
    ///
    /// Returns None when the user already liked it; the row insert and the
    /// `likes_count` increment commit atomically.
    pub async fn like(&self, memory_id: Uuid, user_id: Uuid) -> Result<Option<Like>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO likes (memory_id, user_id)
            VALUES ($1, $2)
            RETURNING created_at
            "#,
        )
        .bind(memory_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            // Unique violation on the natural key: already liked. Dropping
            // the transaction rolls it back.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        sqlx::query(
            r#"
            UPDATE memories
            SET likes_count = likes_count + 1
            WHERE id = $1
            "#,
        )
        .bind(memory_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Like {
            memory_id,
            user_id,
            created_at: row.get("created_at"),
        }))
    }

    /// Unlike a memory
    ///
    /// Returns false when no like existed; the counter is untouched in
    /// that case.
    pub async fn unlike(&self, memory_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE memory_id = $1 AND user_id = $2
            "#,
        )
        .bind(memory_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE memories
            SET likes_count = likes_count - 1
            WHERE id = $1
            "#,
        )
        .bind(memory_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    /// List a memory's likes with liker display info, newest first
    pub async fn list_for_memory(&self, memory_id: Uuid) -> Result<Vec<LikeWithUser>> {
        let rows = sqlx::query(
            r#"
            SELECT l.memory_id, l.user_id, l.created_at,
                   u.name AS user_name, u.avatar_url AS user_avatar_url
            FROM likes l
            JOIN users u ON l.user_id = u.id
            WHERE l.memory_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(memory_id)
        .fetch_all(&self.pool)
        .await?;

        let likes = rows
            .into_iter()
            .map(|row| LikeWithUser {
                memory_id: row.get("memory_id"),
                user_id: row.get("user_id"),
                created_at: row.get("created_at"),
                user_name: row.get("user_name"),
                user_avatar_url: row.get("user_avatar_url"),
            })
            .collect();

        Ok(likes)
    }
}
