//! Session gateway port: the identity provider as an external capability.
//!
//! The routing gate never talks to a provider SDK directly. It sees only
//! this trait, which keeps the decision logic provider-agnostic and
//! unit-testable with a fake.
//!
//! # Failure direction
//!
//! Errors stay distinguishable at this boundary (`Result`), but callers
//! must never treat an error as "authenticated". Ambiguous session state
//! always resolves to unauthenticated.

use async_trait::async_trait;

use crate::domain::foundation::AuthError;
use crate::domain::session::{RequestCookies, SessionOutcome};

/// Resolves and refreshes sessions against the identity provider.
///
/// # Contract
///
/// Implementations must:
/// - Treat an absent or unknown session as the normal unauthenticated
///   outcome (`Ok` with no identity), not as an error
/// - Stage every cookie the provider wants set when a refresh mints new
///   tokens, so the browser's next request carries the refreshed session
/// - Return `AuthError::ProviderUnavailable` for transport failures and
///   provider 5xx responses - never fabricate a success
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Validates the stored session, refreshing it if the provider allows.
    ///
    /// # Returns
    ///
    /// * `Ok(outcome)` with identity - session valid (possibly just
    ///   refreshed; refreshed cookies are staged on the outcome)
    /// * `Ok(outcome)` without identity - no valid session
    /// * `Err(AuthError::ProviderUnavailable)` - provider unreachable
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionOutcome, AuthError>;

    /// Exchanges an OAuth authorization code for a session.
    ///
    /// One-shot and stateless: a failed exchange is terminal for the
    /// request, the user restarts the login flow.
    ///
    /// # Returns
    ///
    /// * `Ok(outcome)` - code accepted, session cookies staged
    /// * `Err(AuthError::ExchangeRejected)` - provider rejected the code
    /// * `Err(AuthError::ProviderUnavailable)` - provider unreachable
    async fn exchange_code(&self, code: &str) -> Result<SessionOutcome, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_gateway_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn SessionGateway) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn SessionGateway>>();
    }
}
