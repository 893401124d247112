use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

mod enrichment;
mod error;
mod middleware;
mod models;
mod policy;
mod repositories;
mod routes;
mod state;
mod storage;

use crate::{
    enrichment::{EnrichmentClient, EnrichmentConfig},
    middleware::{TokenVerifier, VerifierConfig},
    repositories::{
        CommentRepository, FeedRepository, FollowRepository, LikeRepository, MemoryRepository,
        UserRepository,
    },
    state::AppState,
    storage::{StorageClient, StorageConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize the token verifier with the shared secret
    let verifier_config = VerifierConfig::from_env()?;
    let token_verifier = TokenVerifier::new(&verifier_config);

    // Initialize the storage client
    let storage_config = StorageConfig::from_env()?;
    let storage = StorageClient::new(&storage_config).await;

    // Enrichment is optional; without it the enrich endpoint reports an error
    let enrichment = match EnrichmentConfig::from_env() {
        Some(config) => Some(EnrichmentClient::new(&config)?),
        None => {
            warn!("ENRICHMENT_SERVICE_URL not set, enrichment is disabled");
            None
        }
    };

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let memory_repository = MemoryRepository::new(pool.clone());
    let comment_repository = CommentRepository::new(pool.clone());
    let like_repository = LikeRepository::new(pool.clone());
    let follow_repository = FollowRepository::new(pool.clone());
    let feed_repository = FeedRepository::new(pool.clone());

    info!("API service initialized successfully");

    let app_state = AppState {
        token_verifier,
        user_repository,
        memory_repository,
        comment_repository,
        like_repository,
        follow_repository,
        feed_repository,
        storage,
        enrichment,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
    info!("API service listening on 0.0.0.0:3001");

    axum::serve(listener, app).await?;

    Ok(())
}
