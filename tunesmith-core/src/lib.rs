//! # Tunesmith Core
//!
//! Credential lifecycle and catalog orchestration for Tunesmith playlist
//! generation.
//!
//! This crate provides:
//! - The two OAuth grant flows against the music catalog's authorization
//!   server: client-credentials for anonymous search, authorization-code
//!   with refresh for playlist mutation
//! - A process-wide credential guard that keeps the shared service token
//!   fresh under concurrent access without duplicate refreshes
//! - Sequential, rate-limit-paced resolution of free-text track queries
//! - Playlist creation with size-bounded batch writes
//!
//! The HTTP surface (routing, DTOs) lives in the host application; this
//! crate is the service layer underneath it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tunesmith_core::{
//!     CatalogClient, CredentialGuard, SearchOrchestrator, SpotifyConfig, TokenAcquirer,
//! };
//!
//! # async fn run() -> Result<(), tunesmith_core::TunesmithError> {
//! let config = SpotifyConfig::from_env()?;
//! let acquirer = Arc::new(TokenAcquirer::new(config.clone()));
//! let guard = Arc::new(CredentialGuard::new(acquirer));
//! guard.initialize().await?;
//!
//! let orchestrator = SearchOrchestrator::new(CatalogClient::from_config(&config), guard);
//! let tracks = orchestrator
//!     .resolve_queries(&["Bohemian Rhapsody - Queen".to_string()])
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
pub mod credential;
pub mod error;
pub mod generate;
pub mod guard;
pub mod model;
pub mod oauth;
pub mod secret;

// Re-export commonly used types at crate root
pub use model::{PlaylistSummary, Track};

pub use secret::Secret;

pub use clock::{Clock, ManualClock, SystemClock};

pub use config::{ConfigError, SpotifyConfig};

pub use credential::{CredentialSource, EXPIRY_SKEW_SECONDS, ServiceCredential, UserCredential};

pub use oauth::{AUTHORIZATION_SCOPES, AuthError, TokenAcquirer, build_authorization_url};

pub use guard::{CredentialError, CredentialGuard};

pub use catalog::{
    CatalogClient, CatalogError, PlaylistError, PlaylistWriter, SEARCH_RESULT_LIMIT,
    SearchOrchestrator, TRACK_BATCH_LIMIT,
};

pub use generate::{
    DEFAULT_TRACK_COUNT, EMPTY_RESULT_SENTINEL, GenerationError, PlaylistGenerator,
    TracklistGenerator, parse_track_lines,
};

pub use error::TunesmithError;
