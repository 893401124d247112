//! API service routes
//!
//! Protected routes sit behind the bearer-token middleware; the public
//! ones (single memory, feed, listings, profiles) resolve an optional
//! identity themselves where visibility depends on who is asking.

use axum::{
    Json, Router,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

pub mod comments;
pub mod feed;
pub mod followers;
pub mod likes;
pub mod memories;
pub mod storage;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/memories",
            post(memories::create_memory)
                .put(memories::update_memory)
                .delete(memories::delete_memory),
        )
        .route("/memories/privacy", put(memories::toggle_privacy))
        .route("/memories/all", get(memories::list_memories))
        .route("/memories/enrich", post(memories::enrich_memory))
        .route("/likes", post(likes::like_memory).delete(likes::unlike_memory))
        .route(
            "/comments",
            post(comments::add_comment).delete(comments::delete_comment),
        )
        .route("/followers/follow", post(followers::follow_user))
        .route("/followers/unfollow", post(followers::unfollow_user))
        .route("/users/me", put(users::update_profile))
        .route("/storage/upload-url", post(storage::upload_url))
        .route("/storage/download-url", post(storage::download_url))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/memories/:id", get(memories::get_memory))
        .route("/likes/:memory_id", get(likes::list_likes))
        .route("/comments/:memory_id", get(comments::list_comments))
        .route("/followers/:user_id/followers", get(followers::list_followers))
        .route("/followers/:user_id/following", get(followers::list_following))
        .route("/feed", get(feed::get_feed))
        .route("/users/:id", get(users::get_user_profile))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, header};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    use crate::error::ApiError;
    use crate::middleware::{Claims, TokenVerifier, VerifierConfig};
    use crate::repositories::{
        CommentRepository, FeedRepository, FollowRepository, LikeRepository, MemoryRepository,
        UserRepository,
    };
    use crate::storage::{StorageClient, StorageConfig};
    use common::database::{DatabaseConfig, init_pool};
    use sqlx::PgPool;

    const SECRET: &str = "test-secret-not-for-production";

    async fn test_state() -> (AppState, PgPool) {
        let pool = init_pool(&DatabaseConfig::from_env().unwrap()).await.unwrap();
        let storage = StorageClient::new(&StorageConfig::from_env().unwrap()).await;

        let state = AppState {
            token_verifier: TokenVerifier::new(&VerifierConfig {
                secret: SECRET.to_string(),
            }),
            user_repository: UserRepository::new(pool.clone()),
            memory_repository: MemoryRepository::new(pool.clone()),
            comment_repository: CommentRepository::new(pool.clone()),
            like_repository: LikeRepository::new(pool.clone()),
            follow_repository: FollowRepository::new(pool.clone()),
            feed_repository: FeedRepository::new(pool.clone()),
            storage,
            enrichment: None,
        };

        (state, pool)
    }

    fn bearer_headers(user_id: Uuid) -> HeaderMap {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: user_id,
            email: format!("{}@example.com", user_id),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        headers
    }

    /// Likes and comments of a private memory follow the memory's own
    /// visibility: strangers get Forbidden, the owner gets the listings.
    #[tokio::test]
    #[ignore = "requires a provisioned PostgreSQL database"]
    async fn test_private_memory_interactions_follow_memory_visibility() {
        let (state, pool) = test_state().await;

        let owner = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
            .bind(owner)
            .bind(format!("{}@example.com", owner))
            .execute(&pool)
            .await
            .unwrap();
        let memory: Uuid = sqlx::query_scalar(
            "INSERT INTO memories (user_id, file_url, is_public) VALUES ($1, 'https://example.com/m.jpg', FALSE) RETURNING id",
        )
        .bind(owner)
        .fetch_one(&pool)
        .await
        .unwrap();

        // Anonymous requests see neither listing.
        let likes = likes::list_likes(State(state.clone()), HeaderMap::new(), Path(memory)).await;
        assert!(matches!(likes, Err(ApiError::Forbidden)));
        let comments =
            comments::list_comments(State(state.clone()), HeaderMap::new(), Path(memory)).await;
        assert!(matches!(comments, Err(ApiError::Forbidden)));

        // The owner sees both.
        let headers = bearer_headers(owner);
        let likes = likes::list_likes(State(state.clone()), headers.clone(), Path(memory)).await;
        assert!(likes.is_ok());
        let comments = comments::list_comments(State(state), headers, Path(memory)).await;
        assert!(comments.is_ok());

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
