//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `RYOKUCHAT` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ryokuchat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the RyokuChat gateway.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (Supabase identity provider)
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RYOKUCHAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RYOKUCHAT__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `RYOKUCHAT__DATABASE__URL=...` -> `database.url = ...`
    /// - `RYOKUCHAT__AUTH__SUPABASE_URL=...` -> `auth.supabase_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are missing
    /// or values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RYOKUCHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var(
            "RYOKUCHAT__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
        env::set_var(
            "RYOKUCHAT__AUTH__SUPABASE_URL",
            "https://myproject.supabase.co",
        );
        env::set_var("RYOKUCHAT__AUTH__SUPABASE_PUBLISHABLE_KEY", "sb-publishable-xxx");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("RYOKUCHAT__DATABASE__URL");
        env::remove_var("RYOKUCHAT__AUTH__SUPABASE_URL");
        env::remove_var("RYOKUCHAT__AUTH__SUPABASE_PUBLISHABLE_KEY");
        env::remove_var("RYOKUCHAT__SERVER__PORT");
        env::remove_var("RYOKUCHAT__SERVER__ENVIRONMENT");
    }

    #[test]
    fn load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.auth.supabase_url, "https://myproject.supabase.co");
    }

    #[test]
    fn loaded_config_validates() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let config = AppConfig::load().unwrap();
        clear_env();

        assert!(config.validate().is_ok());
        assert!(!config.is_production());
    }

    #[test]
    fn server_overrides_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("RYOKUCHAT__SERVER__PORT", "8080");
        env::set_var("RYOKUCHAT__SERVER__ENVIRONMENT", "production");
        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.server.port, 8080);
        assert!(config.is_production());
    }

    #[test]
    fn missing_database_url_fails_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "RYOKUCHAT__AUTH__SUPABASE_URL",
            "https://myproject.supabase.co",
        );
        env::set_var("RYOKUCHAT__AUTH__SUPABASE_PUBLISHABLE_KEY", "sb-publishable-xxx");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
