//! Authentication adapters.
//!
//! Implementations of the `SessionGateway` port:
//!
//! - `supabase` - Production adapter speaking the Supabase auth HTTP API
//! - `mock` - Test implementation that doesn't require an external service

mod mock;
mod supabase;

pub use mock::MockSessionGateway;
pub use supabase::{SupabaseConfig, SupabaseSessionGateway};

/// Cookie holding the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Cookie holding the long-lived refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";
