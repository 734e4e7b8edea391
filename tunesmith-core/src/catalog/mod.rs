//! Catalog orchestration against the music Web API.
//!
//! This module provides:
//! - [`client`] - Raw HTTP surface: search, profile, and playlist endpoints
//! - [`search`] - Sequential query resolution with rate-limit pacing
//! - [`playlist`] - Playlist creation and batched track submission

pub mod client;
pub mod playlist;
pub mod search;

pub use client::{CatalogClient, CatalogError};
pub use playlist::{PlaylistError, PlaylistWriter, TRACK_BATCH_LIMIT};
pub use search::{SEARCH_RESULT_LIMIT, SearchOrchestrator};
