//! HTTP adapters - the axum surface of the gateway.
//!
//! - `gate` - the session-refresh + routing-gate middleware and the
//!   `CurrentUser` extractor
//! - `callback` - the OAuth code-exchange route handler
//! - `pages` - placeholder page handlers
//! - `router` - application state and router assembly

pub mod callback;
pub mod gate;
pub mod pages;
pub mod router;

pub use gate::CurrentUser;
pub use router::{app_router, AppState};
