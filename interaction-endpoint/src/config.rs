//! Configuration module for environment variable parsing.
//!
//! The configuration is read once at process start and injected into the
//! request handler. Required values are kept optional here so that a missing
//! variable surfaces per request as a server error instead of a crash loop.

use std::env;

use thiserror::Error;
use tracing::warn;

/// Environment variable holding the hex-encoded Ed25519 public key.
pub const APPLICATION_PUBLIC_KEY: &str = "APPLICATION_PUBLIC_KEY";

/// Environment variable holding the application identifier.
pub const APPLICATION_ID: &str = "APPLICATION_ID";

/// Environment variable holding the HTTP listen port.
pub const PORT: &str = "PORT";

const DEFAULT_PORT: u16 = 8080;

/// A required configuration value is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("The environment {name} is not defined.")]
    Missing { name: &'static str },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identifier every inbound interaction must carry
    pub application_id: Option<String>,

    /// Hex-encoded Ed25519 public key used to verify request signatures
    pub application_public_key: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty(PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env_var = PORT, value = %raw, "Invalid port, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Config {
            application_id: non_empty(APPLICATION_ID),
            application_public_key: non_empty(APPLICATION_PUBLIC_KEY),
            port,
        }
    }

    /// The configured application identifier.
    pub fn application_id(&self) -> Result<&str, ConfigError> {
        require(&self.application_id, APPLICATION_ID)
    }

    /// The configured hex-encoded public key.
    pub fn application_public_key(&self) -> Result<&str, ConfigError> {
        require(&self.application_public_key, APPLICATION_PUBLIC_KEY)
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::Missing { name })
}
