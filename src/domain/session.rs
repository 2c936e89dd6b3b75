//! Per-request session value objects.
//!
//! A `SessionOutcome` is produced once per request by the session gateway,
//! consumed immediately by the routing gate, and discarded after the
//! response is emitted. Cookies are opaque to this layer: the gateway relays
//! whatever name/value/attribute triples the identity provider specifies,
//! and the whole set is replaced atomically on each refresh.

use std::collections::BTreeMap;

use crate::domain::foundation::Identity;

/// The cookies attached to an inbound request, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies(BTreeMap<String, String>);

impl RequestCookies {
    /// Creates an empty cookie set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cookie set from (name, value) pairs. Later duplicates win.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Returns the value of the named cookie, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if the request carried no cookies.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `SameSite` policy for a staged cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Attributes for a staged cookie, as dictated by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    /// Cookie path scope.
    pub path: String,

    /// Max-Age in seconds. `Some(0)` removes the cookie; `None` makes it
    /// a session cookie.
    pub max_age_secs: Option<i64>,

    /// Whether the cookie is hidden from client-side script.
    pub http_only: bool,

    /// Whether the cookie requires a TLS connection.
    pub secure: bool,

    /// Cross-site sending policy.
    pub same_site: SameSite,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age_secs: None,
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// A single cookie the provider wants set on the outbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieUpdate {
    pub name: String,
    pub value: String,
    pub attributes: CookieAttributes,
}

impl CookieUpdate {
    /// Stages a cookie with the given attributes.
    pub fn set(name: impl Into<String>, value: impl Into<String>, attributes: CookieAttributes) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes,
        }
    }

    /// Stages a removal: empty value, Max-Age zero.
    pub fn removal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            attributes: CookieAttributes {
                max_age_secs: Some(0),
                ..CookieAttributes::default()
            },
        }
    }

    /// Returns true if this update removes the cookie.
    pub fn is_removal(&self) -> bool {
        self.attributes.max_age_secs == Some(0)
    }
}

/// The session gateway's result for one request.
///
/// No identity means "unauthenticated" - the normal result for a visitor
/// without a valid session, not an error.
#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    /// The resolved identity, absent for unauthenticated requests.
    pub identity: Option<Identity>,

    /// Cookies to stage on the outbound response, in provider order.
    pub cookies: Vec<CookieUpdate>,
}

impl SessionOutcome {
    /// An unauthenticated outcome with no cookie updates.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// An authenticated outcome with no cookie updates.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            cookies: Vec::new(),
        }
    }

    /// Attaches cookie updates to this outcome.
    pub fn with_cookies(mut self, cookies: Vec<CookieUpdate>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Returns true if an identity was resolved.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
