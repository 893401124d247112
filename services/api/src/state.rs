//! Application state shared across handlers
//!
//! Everything here is constructed once in `main` and injected; no module
//! reaches for a global connection handle.

use crate::enrichment::EnrichmentClient;
use crate::middleware::TokenVerifier;
use crate::repositories::{
    CommentRepository, FeedRepository, FollowRepository, LikeRepository, MemoryRepository,
    UserRepository,
};
use crate::storage::StorageClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub token_verifier: TokenVerifier,
    pub user_repository: UserRepository,
    pub memory_repository: MemoryRepository,
    pub comment_repository: CommentRepository,
    pub like_repository: LikeRepository,
    pub follow_repository: FollowRepository,
    pub feed_repository: FeedRepository,
    pub storage: StorageClient,
    /// None when no enrichment service is configured
    pub enrichment: Option<EnrichmentClient>,
}
