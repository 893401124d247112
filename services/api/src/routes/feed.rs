//! Feed route

use axum::{Json, extract::Query, extract::State, response::IntoResponse};
use tracing::error;

use crate::{
    error::ApiError,
    models::{
        PageQuery,
        feed::{FeedQuery, FeedType},
    },
    state::AppState,
};

/// Get the public or following feed
///
/// An empty page is a successful response, not a 404; NotFound is
/// reserved for single-resource lookups.
pub async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = PageQuery {
        limit: query.limit,
        offset: query.offset,
    }
    .resolve()
    .map_err(ApiError::Validation)?;

    let feed_type = FeedType::parse(query.feed_type.as_deref().unwrap_or("public"))
        .ok_or_else(|| ApiError::Validation("Invalid feed type".to_string()))?;

    let items = match feed_type {
        FeedType::Public => state
            .feed_repository
            .public_feed(limit, offset)
            .await
            .map_err(|e| {
                error!("Failed to load public feed: {}", e);
                ApiError::InternalServerError
            })?,
        FeedType::Following => {
            let user_id = query.user_id.ok_or_else(|| {
                ApiError::Validation("user_id is required for the following feed".to_string())
            })?;

            state
                .feed_repository
                .following_feed(user_id, limit, offset)
                .await
                .map_err(|e| {
                    error!("Failed to load following feed: {}", e);
                    ApiError::InternalServerError
                })?
        }
    };

    Ok(Json(items))
}
