use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod models;
mod provider;
mod repositories;
mod routes;
mod token;
mod validation;

use crate::{provider::IdentityProvider, token::TokenService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub token_service: TokenService,
    pub identity_provider: IdentityProvider,
    pub user_repository: crate::repositories::UserRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize token service
    let token_config = token::TokenConfig::from_env()?;
    let token_service = TokenService::new(&token_config);

    // Initialize the identity provider client
    let provider_config = provider::ProviderConfig::from_env()?;
    let identity_provider = IdentityProvider::new(&provider_config)?;

    let user_repository = crate::repositories::UserRepository::new(pool);

    info!("Authentication service initialized successfully");

    let app_state = AppState {
        token_service,
        identity_provider,
        user_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Authentication service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
