//! OAuth callback route handler.
//!
//! The OAuth provider redirects here with an authorization code; the
//! handler exchanges it for a session and forwards the browser onward.
//! One-shot and stateless: a failed exchange sends the user back to the
//! login page to restart the flow.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::domain::routing::{HOME_PATH, LOGIN_PATH};

use super::gate::apply_cookie_updates;
use super::AppState;

/// Query parameters on the provider's callback redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for a session.
    pub code: Option<String>,

    /// Where to land after a successful exchange.
    pub next: Option<String>,
}

impl CallbackQuery {
    /// Post-login destination. Only same-origin paths are honored; anything
    /// else falls back to the home path.
    fn next_path(&self) -> &str {
        match self.next.as_deref() {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
            _ => HOME_PATH,
        }
    }
}

/// `GET /auth/callback?code=<string>&next=<path>`
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.as_deref() else {
        tracing::debug!("callback without authorization code");
        return Redirect::temporary(LOGIN_PATH).into_response();
    };

    match state.gateway.exchange_code(code).await {
        Ok(outcome) => {
            let mut response = Redirect::temporary(query.next_path()).into_response();
            apply_cookie_updates(response.headers_mut(), &outcome.cookies);
            response
        }
        Err(err) => {
            tracing::warn!(error = %err, "authorization code exchange failed");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}
