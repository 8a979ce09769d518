use std::net::SocketAddr;

use interview_pilot::api::{create_router, AppState};
use interview_pilot::infrastructure::{create_pool, AppConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let redis_pool = create_pool(&config.redis_url)?;
    info!("Redis pool initialized");

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState::new(redis_pool, config)?;
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
