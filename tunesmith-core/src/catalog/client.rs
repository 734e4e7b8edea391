//! HTTP client for the catalog Web API.
//!
//! Thin typed wrapper over the endpoints the crate consumes: track search,
//! "who am I", playlist creation, batched item addition, and the current
//! user's playlists. Credentials are passed per call; the client itself
//! holds no auth state.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::config::SpotifyConfig;
use crate::guard::CredentialError;
use crate::model::{PlaylistSummary, Track};

/// Error type for catalog API calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered with a non-success status.
    #[error("catalog request to {endpoint} failed with status {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Transport-level failure or undecodable response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No valid service credential was available.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Client for the catalog Web API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client from the application configuration.
    pub fn from_config(config: &SpotifyConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    /// Search tracks for a free-text query, returning the server ranking.
    pub async fn search_tracks(
        &self,
        access_token: &str,
        query: &str,
        limit: u8,
    ) -> Result<Vec<Track>, CatalogError> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .bearer_auth(access_token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await?;
        let response = check_status(response, "search")?;

        let body: SearchResponse = response.json().await?;
        Ok(body
            .tracks
            .unwrap_or_default()
            .items
            .into_iter()
            .map(TrackObject::into_track)
            .collect())
    }

    /// Resolve the account id of the user the access token belongs to.
    pub async fn current_user_id(&self, access_token: &str) -> Result<String, CatalogError> {
        let response = self
            .http
            .get(format!("{}/me", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;
        let response = check_status(response, "me")?;

        let profile: UserProfile = response.json().await?;
        Ok(profile.id)
    }

    /// Create a new non-public playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, CatalogError> {
        let response = self
            .http
            .post(format!("{}/users/{}/playlists", self.base_url, user_id))
            .bearer_auth(access_token)
            .json(&serde_json::json!({
                "name": name,
                "description": description,
                "public": false,
            }))
            .send()
            .await?;
        let response = check_status(response, "create_playlist")?;

        let playlist: CreatedPlaylist = response.json().await?;
        Ok(playlist.id)
    }

    /// Append track URIs to a playlist, in the given order.
    ///
    /// The API rejects more than 50 URIs per call; callers chunk accordingly.
    pub async fn add_playlist_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), CatalogError> {
        let response = self
            .http
            .post(format!("{}/playlists/{}/tracks", self.base_url, playlist_id))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "uris": uris }))
            .send()
            .await?;
        check_status(response, "add_playlist_items")?;
        Ok(())
    }

    /// List the playlists of the user the access token belongs to.
    pub async fn current_user_playlists(
        &self,
        access_token: &str,
    ) -> Result<Vec<PlaylistSummary>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/me/playlists", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;
        let response = check_status(response, "current_user_playlists")?;

        let page: PlaylistPage = response.json().await?;
        Ok(page
            .items
            .into_iter()
            .map(PlaylistObject::into_summary)
            .collect())
    }
}

fn check_status(
    response: reqwest::Response,
    endpoint: &'static str,
) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CatalogError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

// Wire shapes. Fields the crate does not consume are omitted; absent fields
// decode to their defaults rather than failing the whole response.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Default, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    #[serde(default)]
    album: AlbumObject,
    #[serde(default)]
    external_urls: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistObject {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct AlbumObject {
    #[serde(default)]
    images: Vec<ImageObject>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageObject {
    #[serde(default)]
    url: String,
}

impl TrackObject {
    fn into_track(self) -> Track {
        let artist = self
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();
        let artwork_url = self
            .album
            .images
            .into_iter()
            .next()
            .map(|i| i.url)
            .unwrap_or_default();
        let external_url = self
            .external_urls
            .get("spotify")
            .cloned()
            .unwrap_or_default();

        Track {
            id: self.id,
            title: self.name,
            artist,
            artwork_url,
            external_url,
            playlist_label: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPlaylist {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistObject>,
}

#[derive(Debug, Deserialize)]
struct PlaylistObject {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    // nullable on the wire, not just omittable
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Vec<ImageObject>,
    #[serde(default)]
    tracks: PlaylistTracksRef,
    #[serde(default)]
    public: Option<bool>,
    #[serde(default)]
    collaborative: bool,
    #[serde(default)]
    external_urls: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistTracksRef {
    #[serde(default)]
    total: u32,
}

impl PlaylistObject {
    fn into_summary(self) -> PlaylistSummary {
        let artwork_url = self
            .images
            .into_iter()
            .next()
            .map(|i| i.url)
            .unwrap_or_default();
        let external_url = self
            .external_urls
            .get("spotify")
            .cloned()
            .unwrap_or_default();

        PlaylistSummary {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            artwork_url,
            total_tracks: self.tracks.total,
            public: self.public.unwrap_or_default(),
            collaborative: self.collaborative,
            external_url,
        }
    }
}
