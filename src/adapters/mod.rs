//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session gateway implementations (Supabase, mock)
//! - `http` - The axum router, gate middleware, and page handlers
//! - `postgres` - Connection pool construction and schema migrations

pub mod auth;
pub mod http;
pub mod postgres;
