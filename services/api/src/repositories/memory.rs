//! Memory repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::enrichment::EnrichmentOutcome;
use crate::models::memory::{CreateMemoryRequest, Memory};

const MEMORY_COLUMNS: &str = "id, user_id, description, file_url, tags, is_public, \
     generated_story, generated_image_url, generated_music_url, ai_context, is_ai_enhanced, \
     likes_count, comments_count, created_at, updated_at";

/// Memory repository for database operations
#[derive(Clone)]
pub struct MemoryRepository {
    pool: PgPool,
}

impl MemoryRepository {
    /// Create a new memory repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a memory owned by `owner_id`
    ///
    /// `is_public` defaults to false when absent.
    pub async fn create(&self, owner_id: Uuid, payload: &CreateMemoryRequest) -> Result<Memory> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO memories (user_id, description, file_url, tags, is_public)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEMORY_COLUMNS}
            "#,
        ))
        .bind(owner_id)
        .bind(&payload.description)
        .bind(&payload.file_url)
        .bind(payload.tags.clone().unwrap_or_default())
        .bind(payload.is_public.unwrap_or(false))
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_memory(&row))
    }

    /// Get a memory by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Memory>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {MEMORY_COLUMNS}
            FROM memories
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_memory))
    }

    /// List a user's memories, newest first
    ///
    /// Private rows are included only when the requester is the owner.
    pub async fn list_for_user(&self, owner_id: Uuid, include_private: bool) -> Result<Vec<Memory>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MEMORY_COLUMNS}
            FROM memories
            WHERE user_id = $1 AND (is_public OR $2)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(owner_id)
        .bind(include_private)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_memory).collect())
    }

    /// Persist the mutable fields of an already-merged memory
    ///
    /// The caller applies the patch over the loaded row first; this writes
    /// the merged values back and refreshes `updated_at`.
    pub async fn update(&self, memory: &Memory) -> Result<Memory> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE memories
            SET description = $2, tags = $3, file_url = $4, updated_at = now()
            WHERE id = $1
            RETURNING {MEMORY_COLUMNS}
            "#,
        ))
        .bind(memory.id)
        .bind(&memory.description)
        .bind(&memory.tags)
        .bind(&memory.file_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_memory(&row))
    }

    /// Set the privacy flag
    pub async fn set_privacy(&self, id: Uuid, is_public: bool) -> Result<Option<Memory>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE memories
            SET is_public = $2, updated_at = now()
            WHERE id = $1
            RETURNING {MEMORY_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_memory))
    }

    /// Delete a memory
    ///
    /// Returns the deleted row, or None when it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Memory>> {
        let row = sqlx::query(&format!(
            r#"
            DELETE FROM memories
            WHERE id = $1
            RETURNING {MEMORY_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_memory))
    }

    /// Store the results of an enrichment run
    pub async fn record_enrichment(
        &self,
        id: Uuid,
        outcome: &EnrichmentOutcome,
    ) -> Result<Option<Memory>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE memories
            SET generated_story = $2,
                generated_image_url = $3,
                generated_music_url = $4,
                ai_context = $5,
                is_ai_enhanced = TRUE,
                updated_at = now()
            WHERE id = $1
            RETURNING {MEMORY_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&outcome.story)
        .bind(&outcome.image_url)
        .bind(&outcome.music_url)
        .bind(&outcome.context)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_memory))
    }
}

pub(crate) fn row_to_memory(row: &PgRow) -> Memory {
    Memory {
        id: row.get("id"),
        user_id: row.get("user_id"),
        description: row.get("description"),
        file_url: row.get("file_url"),
        tags: row.get("tags"),
        is_public: row.get("is_public"),
        generated_story: row.get("generated_story"),
        generated_image_url: row.get("generated_image_url"),
        generated_music_url: row.get("generated_music_url"),
        ai_context: row.get("ai_context"),
        is_ai_enhanced: row.get("is_ai_enhanced"),
        likes_count: row.get("likes_count"),
        comments_count: row.get("comments_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
