//! Mock session gateway for testing.
//!
//! Implements the `SessionGateway` port in memory, avoiding the need for a
//! real identity provider in tests.
//!
//! # Example
//!
//! ```ignore
//! use ryokuchat::adapters::auth::MockSessionGateway;
//!
//! let gateway = MockSessionGateway::new()
//!     .with_session("valid-token", test_identity())
//!     .with_code("auth-code", test_identity());
//!
//! let cookies = RequestCookies::from_pairs([("sb-access-token", "valid-token")]);
//! let outcome = gateway.refresh(&cookies).await.unwrap();
//! assert!(outcome.is_authenticated());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::domain::foundation::{AuthError, Identity};
use crate::domain::session::{CookieAttributes, CookieUpdate, RequestCookies, SessionOutcome};
use crate::ports::SessionGateway;

/// Mock session gateway.
///
/// Sessions are keyed by the access-token cookie value; authorization codes
/// by their literal string. Unknown tokens resolve to the unauthenticated
/// outcome with the session cookies cleared, matching the production
/// adapter's shape.
#[derive(Debug, Default)]
pub struct MockSessionGateway {
    /// Map of access-token cookie values to identities.
    sessions: RwLock<HashMap<String, Identity>>,
    /// Map of authorization codes to identities.
    codes: RwLock<HashMap<String, Identity>>,
    /// Cookies staged on every successful refresh, for refresh-propagation
    /// assertions.
    staged_cookies: RwLock<Vec<CookieUpdate>>,
    /// Optional error returned by every call (for error-path testing).
    force_error: RwLock<Option<AuthError>>,
    /// Number of `refresh` calls, for gate-bypass assertions.
    refresh_calls: AtomicUsize,
}

impl MockSessionGateway {
    /// Creates a new empty mock gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session: the given access-token cookie value resolves to
    /// the identity.
    pub fn with_session(self, token: impl Into<String>, identity: Identity) -> Self {
        self.sessions.write().unwrap().insert(token.into(), identity);
        self
    }

    /// Registers an authorization code accepted by `exchange_code`.
    pub fn with_code(self, code: impl Into<String>, identity: Identity) -> Self {
        self.codes.write().unwrap().insert(code.into(), identity);
        self
    }

    /// Stages cookies on every successful refresh, as a provider that just
    /// rotated the session would.
    pub fn with_staged_cookies(self, cookies: Vec<CookieUpdate>) -> Self {
        *self.staged_cookies.write().unwrap() = cookies;
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a session at runtime.
    pub fn add_session(&self, token: impl Into<String>, identity: Identity) {
        self.sessions.write().unwrap().insert(token.into(), identity);
    }

    /// Removes a session, making its token invalid.
    pub fn remove_session(&self, token: &str) {
        self.sessions.write().unwrap().remove(token);
    }

    /// Returns how many times `refresh` was invoked.
    pub fn refresh_call_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn mock_session_cookies(identity_token: &str) -> Vec<CookieUpdate> {
        vec![
            CookieUpdate::set(
                ACCESS_TOKEN_COOKIE,
                identity_token,
                CookieAttributes {
                    max_age_secs: Some(3600),
                    ..CookieAttributes::default()
                },
            ),
            CookieUpdate::set(
                REFRESH_TOKEN_COOKIE,
                format!("{identity_token}-refresh"),
                CookieAttributes {
                    max_age_secs: Some(86400),
                    ..CookieAttributes::default()
                },
            ),
        ]
    }
}

#[async_trait]
impl SessionGateway for MockSessionGateway {
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionOutcome, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        let Some(token) = cookies.get(ACCESS_TOKEN_COOKIE) else {
            return Ok(SessionOutcome::unauthenticated());
        };

        match self.sessions.read().unwrap().get(token).cloned() {
            Some(identity) => Ok(SessionOutcome::authenticated(identity)
                .with_cookies(self.staged_cookies.read().unwrap().clone())),
            None => Ok(SessionOutcome::unauthenticated().with_cookies(vec![
                CookieUpdate::removal(ACCESS_TOKEN_COOKIE),
                CookieUpdate::removal(REFRESH_TOKEN_COOKIE),
            ])),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionOutcome, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        match self.codes.read().unwrap().get(code).cloned() {
            Some(identity) => {
                let token = format!("exchanged-{code}");
                Ok(SessionOutcome::authenticated(identity)
                    .with_cookies(Self::mock_session_cookies(&token)))
            }
            None => Err(AuthError::ExchangeRejected),
        }
    }
}
