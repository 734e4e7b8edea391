//! Playlist creation and batched track submission.
//!
//! [`PlaylistWriter`] turns a validated track-id list into a playlist under
//! the authenticated user's account: resolve the account, create the
//! playlist, then submit track URIs in ordered batches no larger than the
//! API's per-call limit.

use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::client::{CatalogClient, CatalogError};
use crate::model::PlaylistSummary;

/// Maximum number of track URIs accepted per add-items call.
///
/// The API rejects larger batches; chunking is mandatory.
pub const TRACK_BATCH_LIMIT: usize = 50;

/// Description applied when the caller supplies none.
const DEFAULT_DESCRIPTION: &str = "Generated by Tunesmith";

const TRACK_URI_PREFIX: &str = "spotify:track:";

/// Error type for playlist writes.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Caller input was rejected before any network call; never retried.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A batch submission failed after the playlist was created.
    ///
    /// The playlist is not rolled back; it exists, partially populated,
    /// under the returned id.
    #[error("failed to write tracks to playlist {playlist_id}")]
    WriteFailed {
        playlist_id: String,
        #[source]
        source: CatalogError,
    },

    /// Failure before the playlist existed (profile lookup or creation).
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Writes playlists on behalf of an authenticated user.
pub struct PlaylistWriter {
    client: CatalogClient,
}

impl PlaylistWriter {
    /// Create a writer over the given catalog client.
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Create a non-public playlist and populate it with the given tracks.
    ///
    /// Blank and duplicate ids are dropped before submission; the order of
    /// the surviving ids is preserved. Returns the id of the created
    /// playlist.
    pub async fn create_and_populate(
        &self,
        user_access_token: &str,
        name: &str,
        description: Option<&str>,
        track_ids: &[String],
    ) -> Result<String, PlaylistError> {
        if user_access_token.trim().is_empty() {
            return Err(PlaylistError::InvalidArgument {
                reason: "user access token must not be empty",
            });
        }
        if name.trim().is_empty() {
            return Err(PlaylistError::InvalidArgument {
                reason: "playlist name must not be empty",
            });
        }

        let track_ids = dedup_track_ids(track_ids);
        if track_ids.is_empty() {
            return Err(PlaylistError::InvalidArgument {
                reason: "track list must contain at least one non-blank id",
            });
        }

        let user_id = self.client.current_user_id(user_access_token).await?;

        let description = description.unwrap_or(DEFAULT_DESCRIPTION);
        let playlist_id = self
            .client
            .create_playlist(user_access_token, &user_id, name, description)
            .await?;

        tracing::info!(
            playlist_id = %playlist_id,
            tracks = track_ids.len(),
            "created playlist"
        );

        let uris: Vec<String> = track_ids
            .iter()
            .map(|id| format!("{}{}", TRACK_URI_PREFIX, id))
            .collect();

        for batch in uris.chunks(TRACK_BATCH_LIMIT) {
            if let Err(source) = self
                .client
                .add_playlist_items(user_access_token, &playlist_id, batch)
                .await
            {
                tracing::error!(
                    playlist_id = %playlist_id,
                    error = %source,
                    "batch submission failed, aborting remaining batches"
                );
                return Err(PlaylistError::WriteFailed {
                    playlist_id,
                    source,
                });
            }
        }

        Ok(playlist_id)
    }

    /// List the playlists of the user the access token belongs to.
    pub async fn list_user_playlists(
        &self,
        user_access_token: &str,
    ) -> Result<Vec<PlaylistSummary>, PlaylistError> {
        if user_access_token.trim().is_empty() {
            return Err(PlaylistError::InvalidArgument {
                reason: "user access token must not be empty",
            });
        }

        Ok(self.client.current_user_playlists(user_access_token).await?)
    }
}

/// Drop blank and duplicate ids, preserving first-seen order.
fn dedup_track_ids(track_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for id in track_ids {
        let id = id.trim();
        if id.is_empty() || !seen.insert(id.to_string()) {
            continue;
        }
        kept.push(id.to_string());
    }

    kept
}
