//! The routing gate: per-request allow/redirect decisions.
//!
//! The gate consumes the session gateway's outcome plus the request path and
//! picks one of two outcomes: pass through unchanged, or redirect. The
//! decision is a pure function of (identity present, path) - no state, no
//! side effects, trivially idempotent.
//!
//! Two path sets shape the decision:
//!
//! - **Exempt routes** (`/login`, `/signup`, `/auth/callback`): reachable
//!   without a session. Prefix-matched so exempt sub-paths stay exempt.
//! - **Gate bypass** (static assets, framework-internal paths, health):
//!   requests that never consult the session gateway at all. Static
//!   configuration, checked before any provider call.

/// Path the gate sends unauthenticated visitors to.
pub const LOGIN_PATH: &str = "/login";

/// Path the gate sends authenticated visitors to when they hit an
/// auth-only page.
pub const HOME_PATH: &str = "/";

/// Route prefixes reachable without an authenticated identity.
const EXEMPT_PREFIXES: &[&str] = &["/login", "/signup", "/auth/callback"];

/// Path prefixes that never reach the gate.
const BYPASS_PREFIXES: &[&str] = &["/_next/static/", "/_next/image/"];

/// Exact paths that never reach the gate.
const BYPASS_PATHS: &[&str] = &["/favicon.ico", "/healthz"];

/// File extensions served without consulting the gate.
const BYPASS_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Terminal outcome of the routing gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the requested path; the response carries any refreshed cookies.
    PassThrough,

    /// Redirect to the given path instead.
    RedirectTo(&'static str),
}

/// The gate's static route configuration.
#[derive(Debug, Clone)]
pub struct RouteRules {
    exempt_prefixes: &'static [&'static str],
    login_path: &'static str,
    home_path: &'static str,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            exempt_prefixes: EXEMPT_PREFIXES,
            login_path: LOGIN_PATH,
            home_path: HOME_PATH,
        }
    }
}

impl RouteRules {
    /// Returns true if the path is reachable without a session.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }

    /// Returns true if the request must never consult the session gateway.
    pub fn bypasses_gate(&self, path: &str) -> bool {
        BYPASS_PATHS.contains(&path)
            || BYPASS_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
            || BYPASS_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
    }

    /// Decides the outcome for one request.
    ///
    /// | identity | exempt path | outcome           |
    /// |----------|-------------|-------------------|
    /// | no       | no          | redirect to login |
    /// | yes      | yes         | redirect home     |
    /// | no       | yes         | pass through      |
    /// | yes      | no          | pass through      |
    pub fn decide(&self, identity_present: bool, path: &str) -> RouteDecision {
        match (identity_present, self.is_exempt(path)) {
            (false, false) => RouteDecision::RedirectTo(self.login_path),
            (true, true) => RouteDecision::RedirectTo(self.home_path),
            _ => RouteDecision::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_non_exempt_redirects_to_login() {
        let rules = RouteRules::default();

        assert_eq!(
            rules.decide(false, "/profile"),
            RouteDecision::RedirectTo("/login")
        );
        assert_eq!(
            rules.decide(false, "/"),
            RouteDecision::RedirectTo("/login")
        );
        assert_eq!(
            rules.decide(false, "/channels/abc"),
            RouteDecision::RedirectTo("/login")
        );
    }

    #[test]
    fn authenticated_exempt_redirects_home() {
        let rules = RouteRules::default();

        assert_eq!(rules.decide(true, "/login"), RouteDecision::RedirectTo("/"));
        assert_eq!(rules.decide(true, "/signup"), RouteDecision::RedirectTo("/"));
    }

    #[test]
    fn unauthenticated_exempt_passes_through() {
        let rules = RouteRules::default();

        assert_eq!(rules.decide(false, "/login"), RouteDecision::PassThrough);
        assert_eq!(rules.decide(false, "/signup"), RouteDecision::PassThrough);
        assert_eq!(
            rules.decide(false, "/auth/callback"),
            RouteDecision::PassThrough
        );
    }

    #[test]
    fn authenticated_non_exempt_passes_through() {
        let rules = RouteRules::default();

        assert_eq!(rules.decide(true, "/"), RouteDecision::PassThrough);
        assert_eq!(
            rules.decide(true, "/channels/abc"),
            RouteDecision::PassThrough
        );
    }

    #[test]
    fn exempt_matching_is_by_prefix() {
        let rules = RouteRules::default();

        // Sub-paths of exempt routes stay exempt.
        assert!(rules.is_exempt("/login/reset"));
        assert!(rules.is_exempt("/auth/callback/extra"));
        // Similar but non-matching paths are not.
        assert!(!rules.is_exempt("/log"));
        assert!(!rules.is_exempt("/auth"));
    }

    #[test]
    fn decision_is_idempotent() {
        let rules = RouteRules::default();

        for (identity, path) in [
            (false, "/profile"),
            (true, "/login"),
            (false, "/signup"),
            (true, "/channels/abc"),
        ] {
            let first = rules.decide(identity, path);
            let second = rules.decide(identity, path);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn static_assets_bypass_the_gate() {
        let rules = RouteRules::default();

        assert!(rules.bypasses_gate("/_next/static/chunks/main.js"));
        assert!(rules.bypasses_gate("/_next/image/logo"));
        assert!(rules.bypasses_gate("/favicon.ico"));
        assert!(rules.bypasses_gate("/images/avatar.png"));
        assert!(rules.bypasses_gate("/logo.svg"));
        assert!(rules.bypasses_gate("/healthz"));
    }

    #[test]
    fn page_paths_do_not_bypass_the_gate() {
        let rules = RouteRules::default();

        assert!(!rules.bypasses_gate("/"));
        assert!(!rules.bypasses_gate("/login"));
        assert!(!rules.bypasses_gate("/channels/abc"));
        // A path merely containing an asset-like segment is still gated.
        assert!(!rules.bypasses_gate("/channels/png-tips"));
    }
}
