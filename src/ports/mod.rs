//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionGateway` - the identity provider as an external capability:
//!   session refresh and OAuth code exchange.

mod session_gateway;

pub use session_gateway::SessionGateway;
