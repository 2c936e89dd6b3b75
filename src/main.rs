//! RyokuChat gateway entry point.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ryokuchat::adapters::auth::{SupabaseConfig, SupabaseSessionGateway};
use ryokuchat::adapters::http::{app_router, AppState};
use ryokuchat::adapters::postgres;
use ryokuchat::config::AppConfig;
use ryokuchat::domain::routing::RouteRules;
use ryokuchat::ports::SessionGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server.log_level);
    config.validate()?;

    info!(environment = ?config.server.environment, "starting ryokuchat gateway");

    let pool = postgres::connect(&config.database).await?;
    info!("database connection pool initialized");

    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        info!("database migrations applied");
    }

    let gateway_config = SupabaseConfig::new(
        config.auth.supabase_url.clone(),
        config.auth.supabase_publishable_key.clone(),
    )
    .with_request_timeout(config.auth.request_timeout())
    .with_secure_cookies(config.server.is_production());
    let gateway: Arc<dyn SessionGateway> = Arc::new(SupabaseSessionGateway::new(gateway_config));

    let state = AppState::new(gateway, Arc::new(RouteRules::default()), pool);
    let app =
        app_router(state).layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
