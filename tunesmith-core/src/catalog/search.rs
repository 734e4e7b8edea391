//! Sequential resolution of free-text track queries.
//!
//! Queries resolve strictly in input order, one at a time, with a fixed
//! pause between calls to stay under the catalog API's implicit rate limit.
//! A query that finds nothing, or whose search call fails, contributes
//! nothing to the output; only credential failures abort the whole run.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::client::{CatalogClient, CatalogError};
use crate::guard::CredentialGuard;
use crate::model::Track;

/// Number of server-ranked matches requested per query.
pub const SEARCH_RESULT_LIMIT: u8 = 20;

/// Pause inserted after each query's resolution.
///
/// Total latency is roughly `100ms x query count` plus network time;
/// callers budget for it.
pub const QUERY_PACING: Duration = Duration::from_millis(100);

/// Resolves track queries against the catalog using the shared service
/// credential.
pub struct SearchOrchestrator {
    client: CatalogClient,
    guard: Arc<CredentialGuard>,
}

impl SearchOrchestrator {
    /// Create an orchestrator over the given client and credential guard.
    pub fn new(client: CatalogClient, guard: Arc<CredentialGuard>) -> Self {
        Self { client, guard }
    }

    /// Resolve each query to its best catalog match, in input order.
    ///
    /// Empty input returns empty output without any network activity.
    /// Duplicated queries are resolved independently and may produce
    /// duplicate tracks.
    pub async fn resolve_queries(&self, queries: &[String]) -> Result<Vec<Track>, CatalogError> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let mut resolved = Vec::with_capacity(queries.len());

        for query in queries {
            // re-validated per query; staleness mid-run triggers a refresh
            let credential = self.guard.valid_credential().await?;

            if let Some(track) = self
                .resolve_one(credential.access_token.expose(), query)
                .await
            {
                resolved.push(track);
            }

            tokio::time::sleep(QUERY_PACING).await;
        }

        Ok(resolved)
    }

    /// Best match for a single query, or `None` when the query found
    /// nothing or its search call failed.
    async fn resolve_one(&self, access_token: &str, query: &str) -> Option<Track> {
        match self
            .client
            .search_tracks(access_token, query, SEARCH_RESULT_LIMIT)
            .await
        {
            Ok(tracks) => {
                if tracks.is_empty() {
                    tracing::debug!(query = %query, "no catalog match for query");
                }
                tracks.into_iter().next()
            }
            Err(error) => {
                tracing::warn!(query = %query, error = %error, "track search failed, skipping query");
                None
            }
        }
    }
}
