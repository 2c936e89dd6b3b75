//! Application state and router assembly.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::domain::routing::RouteRules;
use crate::ports::SessionGateway;

use super::callback::oauth_callback;
use super::gate::session_gate;
use super::pages::{channel_page, home_page, login_page, signup_page};

/// Shared per-request dependencies.
///
/// Constructed once in `main` and cloned into each request. All external
/// capabilities are injected here - no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// The identity provider, behind its port.
    pub gateway: Arc<dyn SessionGateway>,

    /// Static routing configuration for the gate.
    pub rules: Arc<RouteRules>,

    /// Postgres connection pool.
    pub db: PgPool,
}

impl AppState {
    /// Creates the application state from its injected dependencies.
    pub fn new(gateway: Arc<dyn SessionGateway>, rules: Arc<RouteRules>, db: PgPool) -> Self {
        Self { gateway, rules, db }
    }
}

/// Builds the application router.
///
/// The gate middleware wraps every route (and the not-found fallback);
/// its bypass list exempts static assets and `/healthz`.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/login", get(login_page))
        .route("/signup", get(signup_page))
        .route("/channels/:channel_id", get(channel_page))
        .route("/auth/callback", get(oauth_callback))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /healthz` - liveness probe, pings the database.
async fn healthz(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Err(err) => {
            tracing::error!("database health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}
