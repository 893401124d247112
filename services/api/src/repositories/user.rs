//! User repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::user::{AccountStatus, User};

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, avatar_url, bio, account_status, email_verified,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    /// Whether a user exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Persist the profile fields of an already-merged user
    ///
    /// The caller applies the patch over the loaded row first; this writes
    /// the merged values back and refreshes `updated_at`.
    pub async fn update_profile(&self, user: &User) -> Result<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, bio = $3, avatar_url = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, email, name, avatar_url, bio, account_status, email_verified,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_user(&row))
    }

    /// Persist a lazily recomputed account status
    pub async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET account_status = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_user(row: &PgRow) -> User {
    let status: String = row.get("account_status");
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        bio: row.get("bio"),
        account_status: AccountStatus::from_str(&status),
        email_verified: row.get("email_verified"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
