//! Playlist generation facade.
//!
//! This module provides:
//! - [`TracklistGenerator`] - Trait for the external text-to-tracklist
//!   collaborator (an LLM chat client in production)
//! - [`PlaylistGenerator`] - Facade composing the generator with the search
//!   orchestrator
//! - [`parse_track_lines`] - Helper for splitting raw generator output
//!
//! The facade fails fast when the service credential is invalid, so a doomed
//! request never spends a generator call.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::search::SearchOrchestrator;
use crate::guard::CredentialGuard;
use crate::model::Track;

/// Number of tracks requested when the caller does not specify one.
pub const DEFAULT_TRACK_COUNT: usize = 20;

/// Phrase a generator answers with when nothing relevant was found.
pub const EMPTY_RESULT_SENTINEL: &str = "No matching tracks found.";

/// Boxed error type returned by generator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for playlist generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service credential is invalid or expired; reauthenticate.
    #[error("service credential is invalid or expired")]
    InvalidPrecondition,

    /// The generator or the catalog resolution failed.
    #[error("playlist generation failed: {source}")]
    Failed {
        #[source]
        source: BoxError,
    },
}

/// Produces an ordered list of plain-text "track - artist" queries for a
/// free-text mood or genre description.
#[async_trait]
pub trait TracklistGenerator: Send + Sync {
    /// Generate up to `track_count` queries for `message`.
    ///
    /// Returns an empty list when nothing relevant was found.
    async fn generate(&self, message: &str, track_count: usize) -> Result<Vec<String>, BoxError>;
}

/// Composes the tracklist generator with catalog resolution.
pub struct PlaylistGenerator {
    generator: Arc<dyn TracklistGenerator>,
    orchestrator: SearchOrchestrator,
    guard: Arc<CredentialGuard>,
}

impl PlaylistGenerator {
    /// Create a facade over the given collaborators.
    pub fn new(
        generator: Arc<dyn TracklistGenerator>,
        orchestrator: SearchOrchestrator,
        guard: Arc<CredentialGuard>,
    ) -> Self {
        Self {
            generator,
            orchestrator,
            guard,
        }
    }

    /// Generate a track list for a free-text message.
    ///
    /// A blank message yields an empty list without any generator or catalog
    /// work. When `playlist_label` is supplied, every resulting track is
    /// stamped with it.
    pub async fn generate_playlist(
        &self,
        message: &str,
        track_count: usize,
        playlist_label: Option<&str>,
    ) -> Result<Vec<Track>, GenerationError> {
        if message.trim().is_empty() {
            return Ok(Vec::new());
        }

        if !self.guard.is_valid() {
            return Err(GenerationError::InvalidPrecondition);
        }

        let queries = self
            .generator
            .generate(message, track_count)
            .await
            .map_err(|source| GenerationError::Failed { source })?;

        tracing::debug!(queries = queries.len(), "generator produced track queries");

        let tracks = self
            .orchestrator
            .resolve_queries(&queries)
            .await
            .map_err(|e| GenerationError::Failed {
                source: Box::new(e),
            })?;

        Ok(match playlist_label {
            Some(label) => stamp_label(tracks, label),
            None => tracks,
        })
    }
}

/// Split raw generator output into trimmed, non-blank query lines.
///
/// The empty-result sentinel maps to an empty list.
pub fn parse_track_lines(raw: &str) -> Vec<String> {
    if raw.trim().eq_ignore_ascii_case(EMPTY_RESULT_SENTINEL) {
        return Vec::new();
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stamp every track with a playlist label, producing new values.
fn stamp_label(tracks: Vec<Track>, label: &str) -> Vec<Track> {
    tracks
        .into_iter()
        .map(|track| track.with_label(label))
        .collect()
}
