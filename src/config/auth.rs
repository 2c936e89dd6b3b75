//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (Supabase identity provider)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Supabase project base URL
    pub supabase_url: String,

    /// Publishable API key sent with every provider call
    pub supabase_publishable_key: SecretString,

    /// Per-call provider timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl AuthConfig {
    /// Get the provider call timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the provider URL.
    /// In development, allows localhost with HTTP.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.supabase_url.is_empty() {
            return Err(ValidationError::MissingRequired("SUPABASE_URL"));
        }
        if self.supabase_publishable_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "SUPABASE_PUBLISHABLE_KEY",
            ));
        }

        if *environment == Environment::Production && !self.supabase_url.starts_with("https://") {
            return Err(ValidationError::SupabaseUrlMustBeHttps);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_publishable_key: SecretString::new(String::new()),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}
