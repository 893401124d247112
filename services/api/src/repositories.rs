//! Repositories for database operations
//!
//! Each repository is a thin `Clone` handle over the shared PgPool,
//! constructed in `main` and injected through [`crate::state::AppState`].

pub mod comment;
pub mod feed;
pub mod follow;
pub mod like;
pub mod memory;
pub mod user;

pub use comment::CommentRepository;
pub use feed::FeedRepository;
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use memory::MemoryRepository;
pub use user::UserRepository;
