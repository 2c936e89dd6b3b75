//! Authentication types for the domain layer.
//!
//! These types represent the identity resolved from a session cookie set.
//! They have **no external dependencies** - any identity provider can
//! populate them via the `SessionGateway` port.
//!
//! # Design Decisions
//!
//! - `Identity` contains only the profile fields the gateway actually uses
//! - `AuthError` is domain-centric, not provider-specific
//! - Types are `Clone` for easy use in request handlers

use super::UserId;
use thiserror::Error;

/// The authenticated user resolved from a validated session.
///
/// This is a **domain type** with no provider dependencies. Any identity
/// provider can populate this struct via the `SessionGateway` port.
#[derive(Debug, Clone)]
pub struct Identity {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Display name if the provider supplied one.
    pub display_name: Option<String>,

    /// Whether the user's email has been verified by the provider.
    pub email_verified: bool,
}

impl Identity {
    /// Creates a new identity.
    ///
    /// Typically called by a `SessionGateway` adapter after the provider
    /// confirmed the session.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
        }
    }

    /// Returns the display name, or the email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Errors that can occur while resolving or exchanging a session.
///
/// These errors are **domain-centric** - they describe what went wrong from
/// the gateway's perspective, not the provider's. An error never means
/// "authenticated": the routing gate treats every variant as an
/// unauthenticated request.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The authorization code was rejected during the OAuth exchange.
    #[error("Authorization code rejected")]
    ExchangeRejected,

    /// The identity provider is unreachable (network, config, 5xx).
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl AuthError {
    /// Creates a provider unavailable error with a message.
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ProviderUnavailable(_))
    }
}
