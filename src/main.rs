//! CrewDesk - HR Management Backend
//! Mission: Authenticate staff, manage departments, balance task load

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crewdesk_backend::{
    api::routes::create_router,
    auth::JwtHandler,
    config::{Config, ServerArgs},
    middleware::{RateLimitConfig, RateLimitLayer},
    store::Database,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_args(ServerArgs::parse())?;

    info!("🚀 CrewDesk backend starting");

    let db = Arc::new(Database::open(&config.database_path)?);
    db.seed_default_admin()?;

    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()));
    let rate_limiter = RateLimitLayer::new(RateLimitConfig::default());

    let app = create_router(db, jwt, rate_limiter);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    // ConnectInfo feeds the per-IP rate limiter with real peer addresses.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewdesk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
