//! Top-level error type for Tunesmith.

use thiserror::Error;

use crate::catalog::client::CatalogError;
use crate::catalog::playlist::PlaylistError;
use crate::config::ConfigError;
use crate::generate::GenerationError;
use crate::guard::CredentialError;
use crate::oauth::AuthError;

/// Top-level error type encompassing all Tunesmith errors.
#[derive(Debug, Error)]
pub enum TunesmithError {
    /// Error while loading configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a token-endpoint exchange.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Error from the service-credential guard.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Error from a catalog API call.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from a playlist write.
    #[error("playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    /// Error from playlist generation.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}
