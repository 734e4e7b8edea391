//! Credential types for the two OAuth grant families.
//!
//! This module provides:
//! - [`ServiceCredential`] - The process-wide client-credentials token
//! - [`UserCredential`] - A user-delegated token set, returned to the caller
//! - [`CredentialSource`] - Trait the guard refreshes service credentials through
//!
//! A service credential is considered stale one skew window before its true
//! expiry so that in-flight requests never race an expiring token.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::oauth::AuthError;
use crate::secret::Secret;

/// Safety margin subtracted from a credential's true expiry, in seconds.
pub const EXPIRY_SKEW_SECONDS: i64 = 60;

/// The service-level access credential obtained via the client-credentials
/// grant.
///
/// Replaced wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCredential {
    /// Bearer token for anonymous catalog access.
    pub access_token: Secret,

    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl ServiceCredential {
    /// Create a new service credential.
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: Secret::new(access_token),
            expires_at,
        }
    }

    /// Whether the credential is still usable at `now`.
    ///
    /// False once `now + skew >= expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECONDS) < self.expires_at
    }
}

/// A user-delegated token set from the authorization-code or refresh grant.
///
/// Not stored server-side; the caller owns persistence and re-submits the
/// refresh token later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    /// Bearer token acting on behalf of the user.
    pub access_token: Secret,

    /// Refresh token for renewing the access token.
    pub refresh_token: Secret,

    /// Token type reported by the authorization server (usually "Bearer").
    pub token_type: String,

    /// Lifetime of the access token in seconds.
    pub expires_in: u64,

    /// When the access token expires.
    pub expires_at: DateTime<Utc>,

    /// Space-separated scopes granted by the user.
    pub scope: String,
}

impl UserCredential {
    /// Create a credential issued at `issued_at`.
    ///
    /// Maintains `expires_at = issued_at + expires_in`.
    pub fn issued(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: u64,
        issued_at: DateTime<Utc>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Secret::new(access_token),
            refresh_token: Secret::new(refresh_token),
            token_type: token_type.into(),
            expires_in,
            expires_at: issued_at + Duration::seconds(expires_in as i64),
            scope: scope.into(),
        }
    }
}

/// Source of fresh service credentials.
///
/// Implemented by [`TokenAcquirer`](crate::oauth::TokenAcquirer) against the
/// real token endpoint; tests substitute counting or failing fakes.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Perform a client-credentials exchange and return the new credential.
    async fn fetch_service_credential(&self) -> Result<ServiceCredential, AuthError>;
}
