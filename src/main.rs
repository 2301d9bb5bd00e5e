use anyhow::Context;
use pixel_music::{
    auth::PostgresUserRepository, build_router, db, playlist::PostgresPlaylistRepository,
    AppConfig, AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_music=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pixel Music server");

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.youtube_api_key.is_none() {
        warn!("YOUTUBE_API_KEY not set, search is disabled");
    }

    let app_state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .context("failed to connect to database")?;
            db::ensure_schema(&pool)
                .await
                .context("failed to prepare database schema")?;
            info!("Using PostgreSQL repositories");

            AppState::with_repositories(
                config,
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresPlaylistRepository::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set, accounts and playlists are kept in memory");
            AppState::in_memory(config)
        }
    };

    let bind_addr = app_state.config.bind_addr();
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
