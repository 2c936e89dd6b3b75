//! Supabase adapter for session refresh and code exchange.
//!
//! This adapter implements the `SessionGateway` port against the Supabase
//! auth HTTP API. Per request it:
//!
//! 1. Reads the access/refresh token cookies
//! 2. Asks the provider for the user behind the access token
//! 3. If the access token expired, redeems the refresh token for a new
//!    token pair and stages replacement cookies
//! 4. Maps the provider's user payload to the domain `Identity`
//!
//! A session the provider rejects outright yields the unauthenticated
//! outcome with the stale cookies staged for removal. Transport failures
//! and provider 5xx responses surface as `AuthError::ProviderUnavailable` -
//! the caller decides the fail direction, this adapter never fabricates a
//! session.
//!
//! # Example
//!
//! ```ignore
//! use ryokuchat::adapters::auth::{SupabaseConfig, SupabaseSessionGateway};
//! use ryokuchat::ports::SessionGateway;
//!
//! let config = SupabaseConfig::new("https://myproject.supabase.co", publishable_key);
//! let gateway = SupabaseSessionGateway::new(config);
//! let outcome = gateway.refresh(&cookies).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use uuid::Uuid;

use super::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::domain::foundation::{AuthError, Identity, UserId};
use crate::domain::session::{
    CookieAttributes, CookieUpdate, RequestCookies, SessionOutcome,
};
use crate::ports::SessionGateway;

/// Refresh tokens outlive access tokens; thirty days matches the provider's
/// default session lifetime.
const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Configuration for the Supabase adapter.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL (e.g., "https://myproject.supabase.co").
    pub base_url: String,

    /// Publishable API key, sent as the `apikey` header on every call.
    pub publishable_key: SecretString,

    /// Timeout for each provider call.
    pub request_timeout: Duration,

    /// Whether staged session cookies require TLS. Enabled in production.
    pub secure_cookies: bool,
}

impl SupabaseConfig {
    /// Create a new configuration with required fields.
    pub fn new(base_url: impl Into<String>, publishable_key: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            publishable_key,
            request_timeout: Duration::from_secs(10),
            secure_cookies: false,
        }
    }

    /// Set a custom per-call timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Mark staged cookies as Secure.
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Build a full auth endpoint URL from a path-and-query suffix.
    fn auth_url(&self, path_and_query: &str) -> String {
        format!(
            "{}/auth/v1{}",
            self.base_url.trim_end_matches('/'),
            path_and_query
        )
    }
}

/// User payload returned by the provider's user and token endpoints.
#[derive(Debug, Deserialize)]
struct UserPayload {
    /// Provider user id; matches `profiles.id` in the schema.
    id: Uuid,

    #[serde(default)]
    email: Option<String>,

    /// Present once the user confirmed their email.
    #[serde(default)]
    email_confirmed_at: Option<String>,

    #[serde(default)]
    user_metadata: UserMetadata,
}

/// Free-form profile metadata; only the display-name keys are read.
#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    user_name: Option<String>,
}

/// Token pair minted by a refresh or code exchange.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,

    /// Access token lifetime in seconds.
    expires_in: i64,

    user: UserPayload,
}

fn identity_from(user: UserPayload) -> Identity {
    let display_name = user
        .user_metadata
        .full_name
        .or(user.user_metadata.name)
        .or(user.user_metadata.user_name);

    Identity::new(
        UserId::from_uuid(user.id),
        user.email.unwrap_or_default(),
        display_name,
        user.email_confirmed_at.is_some(),
    )
}

fn clear_session_cookies() -> Vec<CookieUpdate> {
    vec![
        CookieUpdate::removal(ACCESS_TOKEN_COOKIE),
        CookieUpdate::removal(REFRESH_TOKEN_COOKIE),
    ]
}

/// Supabase session gateway.
///
/// This is the production implementation of `SessionGateway`.
pub struct SupabaseSessionGateway {
    config: SupabaseConfig,
    http_client: reqwest::Client,
}

impl SupabaseSessionGateway {
    /// Create a new gateway. No network call happens until the first request.
    pub fn new(config: SupabaseConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Look up the user behind an access token.
    ///
    /// `Ok(None)` means the provider rejected the token (expired or revoked),
    /// which is a normal outcome, not a failure.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<UserPayload>, AuthError> {
        let url = self.config.auth_url("/user");

        let response = self
            .http_client
            .get(&url)
            .header("apikey", self.config.publishable_key.expose_secret())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("user lookup failed: {}", e);
                AuthError::provider_unavailable(format!("user lookup failed: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            let user = response.json::<UserPayload>().await.map_err(|e| {
                tracing::error!("failed to parse user payload: {}", e);
                AuthError::provider_unavailable(format!("failed to parse user payload: {}", e))
            })?;
            return Ok(Some(user));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }

        tracing::error!("user endpoint returned {}", status);
        Err(AuthError::provider_unavailable(format!(
            "user endpoint returned {}",
            status
        )))
    }

    /// Redeem a refresh token for a new token pair.
    ///
    /// `Ok(None)` means the provider rejected the refresh token.
    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenResponse>, AuthError> {
        let url = self.config.auth_url("/token?grant_type=refresh_token");

        let response = self
            .http_client
            .post(&url)
            .header("apikey", self.config.publishable_key.expose_secret())
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("token refresh failed: {}", e);
                AuthError::provider_unavailable(format!("token refresh failed: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            let session = response.json::<TokenResponse>().await.map_err(|e| {
                tracing::error!("failed to parse token response: {}", e);
                AuthError::provider_unavailable(format!("failed to parse token response: {}", e))
            })?;
            return Ok(Some(session));
        }

        if status.is_client_error() {
            tracing::debug!("refresh token rejected: {}", status);
            return Ok(None);
        }

        tracing::error!("token endpoint returned {}", status);
        Err(AuthError::provider_unavailable(format!(
            "token endpoint returned {}",
            status
        )))
    }

    /// Stage the replacement cookie pair for a freshly minted session.
    fn session_cookies(&self, session: &TokenResponse) -> Vec<CookieUpdate> {
        let secure = self.config.secure_cookies;
        vec![
            CookieUpdate::set(
                ACCESS_TOKEN_COOKIE,
                session.access_token.clone(),
                CookieAttributes {
                    max_age_secs: Some(session.expires_in),
                    secure,
                    ..CookieAttributes::default()
                },
            ),
            CookieUpdate::set(
                REFRESH_TOKEN_COOKIE,
                session.refresh_token.clone(),
                CookieAttributes {
                    max_age_secs: Some(REFRESH_COOKIE_MAX_AGE_SECS),
                    secure,
                    ..CookieAttributes::default()
                },
            ),
        ]
    }
}

#[async_trait]
impl SessionGateway for SupabaseSessionGateway {
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionOutcome, AuthError> {
        let access_token = cookies.get(ACCESS_TOKEN_COOKIE);
        let refresh_token = cookies.get(REFRESH_TOKEN_COOKIE);

        // No session cookies at all: the normal unauthenticated visitor.
        if access_token.is_none() && refresh_token.is_none() {
            return Ok(SessionOutcome::unauthenticated());
        }

        if let Some(token) = access_token {
            if let Some(user) = self.fetch_user(token).await? {
                return Ok(SessionOutcome::authenticated(identity_from(user)));
            }
        }

        // Access token expired or missing; try to mint a new pair.
        if let Some(token) = refresh_token {
            if let Some(session) = self.refresh_session(token).await? {
                tracing::debug!(user = %session.user.id, "session refreshed");
                let staged = self.session_cookies(&session);
                return Ok(
                    SessionOutcome::authenticated(identity_from(session.user))
                        .with_cookies(staged),
                );
            }
        }

        // The browser sent session cookies the provider no longer accepts.
        tracing::debug!("stored session rejected; clearing session cookies");
        Ok(SessionOutcome::unauthenticated().with_cookies(clear_session_cookies()))
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionOutcome, AuthError> {
        let url = self.config.auth_url("/token?grant_type=pkce");

        let response = self
            .http_client
            .post(&url)
            .header("apikey", self.config.publishable_key.expose_secret())
            .json(&serde_json::json!({ "auth_code": code }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("code exchange failed: {}", e);
                AuthError::provider_unavailable(format!("code exchange failed: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            let session = response.json::<TokenResponse>().await.map_err(|e| {
                tracing::error!("failed to parse token response: {}", e);
                AuthError::provider_unavailable(format!("failed to parse token response: {}", e))
            })?;
            tracing::debug!(user = %session.user.id, "authorization code exchanged");
            let staged = self.session_cookies(&session);
            return Ok(
                SessionOutcome::authenticated(identity_from(session.user)).with_cookies(staged),
            );
        }

        if status.is_client_error() {
            tracing::debug!("authorization code rejected: {}", status);
            return Err(AuthError::ExchangeRejected);
        }

        tracing::error!("token endpoint returned {}", status);
        Err(AuthError::provider_unavailable(format!(
            "token endpoint returned {}",
            status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "6ecb71e5-6f3a-4c68-9c25-6f01ad62d1a3";

    fn gateway_for(server: &MockServer) -> SupabaseSessionGateway {
        let config = SupabaseConfig::new(
            server.uri(),
            SecretString::new("publishable-key".to_string()),
        );
        SupabaseSessionGateway::new(config)
    }

    fn user_json() -> serde_json::Value {
        json!({
            "id": USER_ID,
            "email": "alice@example.com",
            "email_confirmed_at": "2026-01-10T09:00:00Z",
            "user_metadata": { "full_name": "Alice" }
        })
    }

    fn session_json() -> serde_json::Value {
        json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_in": 3600,
            "user": user_json()
        })
    }

    #[test]
    fn auth_url_joins_base_and_suffix() {
        let config = SupabaseConfig::new(
            "https://myproject.supabase.co/",
            SecretString::new("key".to_string()),
        );

        assert_eq!(
            config.auth_url("/user"),
            "https://myproject.supabase.co/auth/v1/user"
        );
        assert_eq!(
            config.auth_url("/token?grant_type=pkce"),
            "https://myproject.supabase.co/auth/v1/token?grant_type=pkce"
        );
    }

    #[test]
    fn identity_mapping_reads_metadata_and_confirmation() {
        let user: UserPayload = serde_json::from_value(user_json()).unwrap();
        let identity = identity_from(user);

        assert_eq!(identity.id.to_string(), USER_ID);
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.display_name, Some("Alice".to_string()));
        assert!(identity.email_verified);
    }

    #[test]
    fn identity_mapping_handles_bare_user() {
        let user: UserPayload = serde_json::from_value(json!({ "id": USER_ID })).unwrap();
        let identity = identity_from(user);

        assert_eq!(identity.email, "");
        assert_eq!(identity.display_name, None);
        assert!(!identity.email_verified);
    }

    #[tokio::test]
    async fn no_session_cookies_is_unauthenticated() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        let outcome = gateway.refresh(&RequestCookies::new()).await.unwrap();

        assert!(!outcome.is_authenticated());
        assert!(outcome.cookies.is_empty());
    }

    #[tokio::test]
    async fn valid_access_token_resolves_identity_without_cookie_updates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let cookies = RequestCookies::from_pairs([(ACCESS_TOKEN_COOKIE, "live-token")]);
        let outcome = gateway.refresh(&cookies).await.unwrap();

        assert!(outcome.is_authenticated());
        assert!(outcome.cookies.is_empty());
        assert_eq!(outcome.identity.unwrap().email, "alice@example.com");
    }

    #[tokio::test]
    async fn expired_access_token_is_refreshed_with_replacement_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
            .expect(1)
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let cookies = RequestCookies::from_pairs([
            (ACCESS_TOKEN_COOKIE, "expired"),
            (REFRESH_TOKEN_COOKIE, "still-good"),
        ]);
        let outcome = gateway.refresh(&cookies).await.unwrap();

        assert!(outcome.is_authenticated());
        assert_eq!(outcome.cookies.len(), 2);
        assert_eq!(outcome.cookies[0].name, ACCESS_TOKEN_COOKIE);
        assert_eq!(outcome.cookies[0].value, "new-access");
        assert_eq!(outcome.cookies[0].attributes.max_age_secs, Some(3600));
        assert_eq!(outcome.cookies[1].name, REFRESH_TOKEN_COOKIE);
        assert_eq!(outcome.cookies[1].value, "new-refresh");
    }

    #[tokio::test]
    async fn rejected_refresh_clears_session_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let cookies = RequestCookies::from_pairs([
            (ACCESS_TOKEN_COOKIE, "expired"),
            (REFRESH_TOKEN_COOKIE, "revoked"),
        ]);
        let outcome = gateway.refresh(&cookies).await.unwrap();

        assert!(!outcome.is_authenticated());
        assert_eq!(outcome.cookies.len(), 2);
        assert!(outcome.cookies.iter().all(CookieUpdate::is_removal));
    }

    #[tokio::test]
    async fn provider_5xx_surfaces_as_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let cookies = RequestCookies::from_pairs([(ACCESS_TOKEN_COOKIE, "token")]);
        let result = gateway.refresh(&cookies).await;

        assert!(matches!(result, Err(AuthError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn exchange_code_stages_session_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "pkce"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
            .expect(1)
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let outcome = gateway.exchange_code("auth-code").await.unwrap();

        assert!(outcome.is_authenticated());
        assert_eq!(outcome.cookies.len(), 2);
        assert_eq!(outcome.cookies[0].value, "new-access");
    }

    #[tokio::test]
    async fn rejected_code_is_exchange_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let result = gateway.exchange_code("bad-code").await;

        assert!(matches!(result, Err(AuthError::ExchangeRejected)));
    }
}
