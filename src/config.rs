use std::env;

use pushkind_common::models::config::CommonServerConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value `{value}` for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings of the HTTP server, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie domain for the session middleware.
    pub domain: String,
    /// Public base URL that share links are derived from.
    pub site_url: String,
    /// Directory uploaded images are written to.
    pub media_root: String,
    /// URL prefix the media directory is served under.
    pub media_url: String,
    /// Session signing key. Empty means a random key per process.
    pub secret: String,
    pub auth_service_url: String,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port_raw = var("PORT", "8080");
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port_raw.clone(),
        })?;

        let auth_service_url = lookup("AUTH_SERVICE_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;

        Ok(Self {
            database_url: var("DATABASE_URL", "app.db"),
            address: var("ADDRESS", "127.0.0.1"),
            port,
            domain: var("DOMAIN", "localhost"),
            site_url: var("SITE_URL", "http://localhost:8080")
                .trim_end_matches('/')
                .to_string(),
            media_root: var("MEDIA_ROOT", "./media"),
            media_url: var("MEDIA_URL", "/media").trim_end_matches('/').to_string(),
            secret: var("SECRET_KEY", ""),
            auth_service_url,
        })
    }

    /// Settings shared with the identity middleware.
    pub fn common(&self) -> CommonServerConfig {
        CommonServerConfig {
            secret: self.secret.clone(),
            auth_service_url: self.auth_service_url.clone(),
        }
    }
}
