//! Spotify application configuration.
//!
//! This module provides:
//! - [`SpotifyConfig`] - Client credentials and endpoint URLs
//! - [`ConfigError`] - Errors raised while loading configuration
//!
//! Endpoints default to the production Spotify URLs and can be overridden,
//! which is how the integration tests point the crate at a mock server.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::secret::Secret;

/// Default authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Default token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Default Web API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {name}")]
    MissingVar { name: &'static str },
}

/// Configuration for the Spotify application this process acts as.
///
/// # Example
///
/// ```
/// use tunesmith_core::config::SpotifyConfig;
///
/// let config = SpotifyConfig::new(
///     "my-client-id",
///     "my-client-secret",
///     "http://localhost:8080/callback",
/// );
/// assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// OAuth client ID.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: Secret,

    /// Redirect URI registered for the authorization-code flow.
    pub redirect_uri: String,

    /// OAuth authorization endpoint URL.
    pub auth_url: String,

    /// OAuth token endpoint URL.
    pub token_url: String,

    /// Base URL of the catalog Web API.
    pub api_base_url: String,
}

impl SpotifyConfig {
    /// Create a configuration pointing at the production endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret),
            redirect_uri: redirect_uri.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set the authorization endpoint URL.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Set the token endpoint URL.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Set the Web API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Load configuration from the environment.
    ///
    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, and
    /// `SPOTIFY_REDIRECT_URI` (a `.env` file is honored when present).
    /// `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL`, and `SPOTIFY_API_BASE_URL`
    /// override the production endpoints.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(
            require_env("SPOTIFY_CLIENT_ID")?,
            require_env("SPOTIFY_CLIENT_SECRET")?,
            require_env("SPOTIFY_REDIRECT_URI")?,
        );

        if let Ok(url) = std::env::var("SPOTIFY_AUTH_URL") {
            config.auth_url = url;
        }
        if let Ok(url) = std::env::var("SPOTIFY_TOKEN_URL") {
            config.token_url = url;
        }
        if let Ok(url) = std::env::var("SPOTIFY_API_BASE_URL") {
            config.api_base_url = url;
        }

        Ok(config)
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar { name })
}
