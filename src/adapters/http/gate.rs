//! The routing-gate middleware.
//!
//! Every page request passes through here:
//!
//! ```text
//! Request → bypass check → session refresh → route decision
//!             │                                   │
//!             └── static assets skip the          ├── PassThrough: handler runs,
//!                 gateway entirely                │   refreshed cookies staged,
//!                                                 │   Identity in extensions
//!                                                 └── RedirectTo: 307
//! ```
//!
//! The middleware uses the `SessionGateway` port, keeping it
//! provider-agnostic: production Supabase or a mock, the gate doesn't
//! change. A gateway error is logged and treated as "no identity" - the
//! gate never grants access on uncertain session state.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::domain::foundation::Identity;
use crate::domain::routing::{RouteDecision, LOGIN_PATH};
use crate::domain::session::{CookieUpdate, RequestCookies, SameSite, SessionOutcome};

use super::AppState;

/// Session-refresh + routing-gate middleware.
///
/// Applied to the whole router; the bypass list keeps static assets and
/// health checks from ever consulting the identity provider.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if state.rules.bypasses_gate(&path) {
        return next.run(request).await;
    }

    let cookies = request_cookies(&CookieJar::from_headers(request.headers()));
    let outcome = match state.gateway.refresh(&cookies).await {
        Ok(outcome) => outcome,
        Err(err) => {
            // Ambiguous session state never grants access.
            tracing::warn!(error = %err, "session refresh failed; treating request as unauthenticated");
            SessionOutcome::unauthenticated()
        }
    };

    match state.rules.decide(outcome.is_authenticated(), &path) {
        RouteDecision::RedirectTo(target) => Redirect::temporary(target).into_response(),
        RouteDecision::PassThrough => {
            if let Some(identity) = outcome.identity {
                request.extensions_mut().insert(identity);
            }
            let mut response = next.run(request).await;
            // Session refresh must not be lost on the happy path. Cookies
            // the handler staged itself (the OAuth callback does) win over
            // the gate's.
            let staged: Vec<CookieUpdate> = outcome
                .cookies
                .iter()
                .filter(|update| !has_set_cookie_for(response.headers(), &update.name))
                .cloned()
                .collect();
            apply_cookie_updates(response.headers_mut(), &staged);
            response
        }
    }
}

/// Collects the inbound request's cookies into the domain representation.
pub fn request_cookies(jar: &CookieJar) -> RequestCookies {
    RequestCookies::from_pairs(jar.iter().map(|cookie| (cookie.name(), cookie.value())))
}

/// Appends a `Set-Cookie` header per staged update.
pub fn apply_cookie_updates(headers: &mut HeaderMap, updates: &[CookieUpdate]) {
    for update in updates {
        match HeaderValue::from_str(&set_cookie_header(update)) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(_) => {
                // Provider-supplied values are opaque; a non-header-safe one
                // is dropped rather than poisoning the response.
                tracing::warn!(cookie = %update.name, "dropping cookie with invalid header value");
            }
        }
    }
}

/// Returns true if the response already sets a cookie with this name.
fn has_set_cookie_for(headers: &HeaderMap, name: &str) -> bool {
    headers.get_all(header::SET_COOKIE).iter().any(|value| {
        value
            .to_str()
            .ok()
            .and_then(|v| v.split('=').next())
            .map(|existing| existing == name)
            .unwrap_or(false)
    })
}

fn set_cookie_header(update: &CookieUpdate) -> String {
    let attrs = &update.attributes;
    let mut header = format!("{}={}; Path={}", update.name, update.value, attrs.path);

    if let Some(max_age) = attrs.max_age_secs {
        header.push_str(&format!("; Max-Age={max_age}"));
    }
    if attrs.http_only {
        header.push_str("; HttpOnly");
    }
    if attrs.secure {
        header.push_str("; Secure");
    }
    header.push_str(match attrs.same_site {
        SameSite::Strict => "; SameSite=Strict",
        SameSite::Lax => "; SameSite=Lax",
        SameSite::None => "; SameSite=None",
    });

    header
}

/// Extractor for the identity resolved by the gate.
///
/// Handlers behind the gate can rely on the identity being present; if it
/// isn't (the route was somehow reached without passing the gate), the
/// request is sent back to the login page rather than served.
///
/// # Example
///
/// ```ignore
/// async fn my_page(CurrentUser(user): CurrentUser) -> Html<String> {
///     Html(format!("Hello, {}!", user.display_name_or_email()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<Identity>()
                .cloned()
                .map(CurrentUser)
                .ok_or_else(|| Redirect::temporary(LOGIN_PATH))
        })
    }
}
