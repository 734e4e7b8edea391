//! Domain model types for Tunesmith.
//!
//! This module defines the read models produced from catalog responses:
//! - [`Track`] - A resolved catalog track
//! - [`PlaylistSummary`] - A playlist owned by the authenticated user

use serde::{Deserialize, Serialize};

/// A track resolved from the catalog.
///
/// Immutable after construction; [`with_label`](Track::with_label) produces
/// a new value rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier of the track.
    pub id: String,

    /// Track title.
    pub title: String,

    /// Name of the primary (first-listed) artist.
    pub artist: String,

    /// URL of the album artwork, empty when the catalog has none.
    pub artwork_url: String,

    /// External link to the track, empty when the catalog has none.
    pub external_url: String,

    /// Label of the playlist this track was generated for, if any.
    pub playlist_label: Option<String>,
}

impl Track {
    /// Copy of this track stamped with a playlist label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            playlist_label: Some(label.into()),
            ..self
        }
    }
}

/// Summary of a playlist owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Catalog identifier of the playlist.
    pub id: String,

    /// Playlist name.
    pub name: String,

    /// Playlist description, empty when not set.
    pub description: String,

    /// URL of the playlist artwork, empty when the catalog has none.
    pub artwork_url: String,

    /// Number of tracks on the playlist.
    pub total_tracks: u32,

    /// Whether the playlist is public.
    pub public: bool,

    /// Whether the playlist is collaborative.
    pub collaborative: bool,

    /// External link to the playlist, empty when the catalog has none.
    pub external_url: String,
}
