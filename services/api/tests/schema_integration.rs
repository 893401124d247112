//! Integration tests for the content store schema
//!
//! These tests verify the database-level guarantees the service leans
//! on: the unique constraints behind duplicate detection, the self-follow
//! check, and cascading cleanup under memory deletion. They need a
//! provisioned database and are ignored by default; run them with
//! `cargo test -- --ignored` against a database created from
//! `migrations/`.

use common::database::{DatabaseConfig, init_pool};
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> Result<PgPool, Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    Ok(init_pool(&db_config).await?)
}

async fn insert_user(pool: &PgPool) -> Result<Uuid, Box<dyn std::error::Error>> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(id)
        .bind(format!("{}@example.com", id))
        .execute(pool)
        .await?;
    Ok(id)
}

async fn insert_memory(pool: &PgPool, owner: Uuid) -> Result<Uuid, Box<dyn std::error::Error>> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO memories (user_id, file_url) VALUES ($1, 'https://example.com/m.jpg') RETURNING id",
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn test_duplicate_like_hits_unique_constraint() -> Result<(), Box<dyn std::error::Error>> {
    let pool = test_pool().await?;
    let user = insert_user(&pool).await?;
    let memory = insert_memory(&pool, user).await?;

    sqlx::query("INSERT INTO likes (memory_id, user_id) VALUES ($1, $2)")
        .bind(memory)
        .bind(user)
        .execute(&pool)
        .await?;

    let duplicate = sqlx::query("INSERT INTO likes (memory_id, user_id) VALUES ($1, $2)")
        .bind(memory)
        .bind(user)
        .execute(&pool)
        .await;

    match duplicate {
        Err(sqlx::Error::Database(db)) => assert!(db.is_unique_violation()),
        other => panic!("expected a unique violation, got {:?}", other),
    }

    sqlx::query("DELETE FROM memories WHERE id = $1")
        .bind(memory)
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user)
        .execute(&pool)
        .await?;

    Ok(())
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn test_self_follow_rejected_by_check_constraint() -> Result<(), Box<dyn std::error::Error>>
{
    let pool = test_pool().await?;
    let user = insert_user(&pool).await?;

    let result = sqlx::query("INSERT INTO followers (follower_id, user_id) VALUES ($1, $1)")
        .bind(user)
        .execute(&pool)
        .await;

    assert!(result.is_err(), "self-follow row should be rejected");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user)
        .execute(&pool)
        .await?;

    Ok(())
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn test_memory_delete_cascades_to_likes_and_comments()
-> Result<(), Box<dyn std::error::Error>> {
    let pool = test_pool().await?;
    let user = insert_user(&pool).await?;
    let memory = insert_memory(&pool, user).await?;

    sqlx::query("INSERT INTO likes (memory_id, user_id) VALUES ($1, $2)")
        .bind(memory)
        .bind(user)
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO comments (memory_id, user_id, content) VALUES ($1, $2, 'nice')")
        .bind(memory)
        .bind(user)
        .execute(&pool)
        .await?;

    sqlx::query("DELETE FROM memories WHERE id = $1")
        .bind(memory)
        .execute(&pool)
        .await?;

    let likes: i64 = sqlx::query_scalar("SELECT count(*) FROM likes WHERE memory_id = $1")
        .bind(memory)
        .fetch_one(&pool)
        .await?;
    let comments: i64 = sqlx::query_scalar("SELECT count(*) FROM comments WHERE memory_id = $1")
        .bind(memory)
        .fetch_one(&pool)
        .await?;

    assert_eq!(likes, 0, "likes should cascade with the memory");
    assert_eq!(comments, 0, "comments should cascade with the memory");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user)
        .execute(&pool)
        .await?;

    Ok(())
}
