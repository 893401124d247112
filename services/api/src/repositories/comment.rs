//! Comment repository for database operations
//!
//! Comment inserts and deletes run in the same transaction as the
//! `comments_count` update on the parent memory, so the counter can never
//! drift from the rows it summarizes.

use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::comment::{Comment, CommentWithAuthor};

/// Comment repository for database operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a comment and bump the memory's comment counter atomically
    ///
    /// The caller has already checked that the memory exists. Returns the
    /// comment joined with the author's display name/avatar.
    pub async fn add(
        &self,
        memory_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO comments (memory_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(memory_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE memories
            SET comments_count = comments_count + 1
            WHERE id = $1
            "#,
        )
        .bind(memory_id)
        .execute(&mut *tx)
        .await?;

        let author = sqlx::query(
            r#"
            SELECT name, avatar_url
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CommentWithAuthor {
            id: row.get("id"),
            memory_id,
            user_id: author_id,
            content: content.to_string(),
            created_at: row.get("created_at"),
            user_name: author.get("name"),
            user_avatar_url: author.get("avatar_url"),
        })
    }

    /// Get a comment by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query(
            r#"
            SELECT id, memory_id, user_id, content, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Comment {
            id: row.get("id"),
            memory_id: row.get("memory_id"),
            user_id: row.get("user_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        }))
    }

    /// List a memory's comments with author display info, newest first
    pub async fn list_for_memory(&self, memory_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.memory_id, c.user_id, c.content, c.created_at,
                   u.name AS user_name, u.avatar_url AS user_avatar_url
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.memory_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(memory_id)
        .fetch_all(&self.pool)
        .await?;

        let comments = rows
            .into_iter()
            .map(|row| CommentWithAuthor {
                id: row.get("id"),
                memory_id: row.get("memory_id"),
                user_id: row.get("user_id"),
                content: row.get("content"),
                created_at: row.get("created_at"),
                user_name: row.get("user_name"),
                user_avatar_url: row.get("user_avatar_url"),
            })
            .collect();

        Ok(comments)
    }

    /// Delete a comment and decrement the memory's counter atomically
    ///
    /// Returns false when the comment did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            RETURNING memory_id
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = deleted else {
            return Ok(false);
        };

        let memory_id: Uuid = row.get("memory_id");
        sqlx::query(
            r#"
            UPDATE memories
            SET comments_count = comments_count - 1
            WHERE id = $1
            "#,
        )
        .bind(memory_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool};

    async fn test_pool() -> PgPool {
        let config = DatabaseConfig::from_env().unwrap();
        init_pool(&config).await.unwrap()
    }

    async fn seed_user(pool: &PgPool) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
            .bind(id)
            .bind(format!("{}@example.com", id))
            .execute(pool)
            .await
            .unwrap();
        id
    }

    async fn seed_memory(pool: &PgPool, owner: Uuid) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO memories (user_id, file_url) VALUES ($1, 'https://example.com/m.jpg') RETURNING id",
        )
        .bind(owner)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn comments_count(pool: &PgPool, memory_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT comments_count FROM memories WHERE id = $1")
            .bind(memory_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn comment_rows(pool: &PgPool, memory_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM comments WHERE memory_id = $1")
            .bind(memory_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    /// The counter must track the comment rows through adds and deletes,
    /// and a delete of a missing comment must not decrement it.
    #[tokio::test]
    #[ignore = "requires a provisioned PostgreSQL database"]
    async fn test_comment_counter_tracks_rows() {
        let pool = test_pool().await;
        let repo = CommentRepository::new(pool.clone());

        let owner = seed_user(&pool).await;
        let memory = seed_memory(&pool, owner).await;

        let first = repo.add(memory, owner, "first").await.unwrap();
        repo.add(memory, owner, "second").await.unwrap();
        assert_eq!(comments_count(&pool, memory).await, 2);
        assert_eq!(comment_rows(&pool, memory).await, 2);

        assert!(repo.delete(first.id).await.unwrap());
        assert_eq!(comments_count(&pool, memory).await, 1);
        assert_eq!(comment_rows(&pool, memory).await, 1);

        // Deleting the same comment again finds nothing and must leave the
        // counter untouched.
        assert!(!repo.delete(first.id).await.unwrap());
        assert_eq!(comments_count(&pool, memory).await, 1);

        sqlx::query("DELETE FROM memories WHERE id = $1")
            .bind(memory)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(owner)
            .execute(&pool)
            .await
            .unwrap();
    }
}
