//! RyokuChat - Self-Hosted Chat Application Gateway
//!
//! This crate implements the request-time routing gate for RyokuChat:
//! cookie-based session refresh against the identity provider, the
//! allow/redirect decision per request, the OAuth code-exchange callback,
//! and the Postgres schema for the chat data model.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
