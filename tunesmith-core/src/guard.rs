//! Shared service-credential guard.
//!
//! [`CredentialGuard`] owns the single live [`ServiceCredential`] and is the
//! only synchronization point in the crate. Callers ask it for a currently
//! valid credential; it refreshes at most once per staleness event, however
//! many tasks ask concurrently.
//!
//! # Lifecycle
//!
//! Construction never performs I/O. Hosts call [`initialize`] once at
//! startup; until an acquisition succeeds, every call fails fast with
//! [`CredentialError::Unavailable`] and the next call retries.
//!
//! [`initialize`]: CredentialGuard::initialize

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::credential::{CredentialSource, ServiceCredential};

/// Error type for credential-guard operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No valid service credential could be obtained.
    #[error("service credential unavailable: {message}")]
    Unavailable { message: String },
}

/// Guards the process-wide service credential.
///
/// The credential slot is read through a `RwLock`; the refresh sequence
/// (re-check, exchange, store) runs under a `tokio::sync::Mutex` held across
/// the network call, so concurrent stale callers collapse into one exchange.
pub struct CredentialGuard {
    source: Arc<dyn CredentialSource>,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<ServiceCredential>>,
    refresh: Mutex<()>,
}

impl CredentialGuard {
    /// Create a guard using the system clock.
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    /// Create a guard with an injected clock.
    pub fn with_clock(source: Arc<dyn CredentialSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            current: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Acquire the initial service credential.
    ///
    /// Called once by the host before serving traffic. On failure the guard
    /// holds no credential and [`valid_credential`](Self::valid_credential)
    /// performs the acquisition on demand instead.
    pub async fn initialize(&self) -> Result<(), CredentialError> {
        let credential = self.source.fetch_service_credential().await.map_err(|e| {
            tracing::error!(error = %e, "initial credential acquisition failed");
            CredentialError::Unavailable {
                message: e.to_string(),
            }
        })?;

        *self.current.write() = Some(credential);
        tracing::info!("service credential initialized");
        Ok(())
    }

    /// Whether the current credential is fresh, without side effects.
    pub fn is_valid(&self) -> bool {
        let now = self.clock.now();
        self.current
            .read()
            .as_ref()
            .is_some_and(|c| c.is_valid_at(now))
    }

    /// A currently valid service credential, refreshing if necessary.
    ///
    /// Double-checked: a caller that finds the credential stale takes the
    /// refresh lock, re-checks (a concurrent caller may have refreshed
    /// first), and only then performs the exchange. The lock is released on
    /// every exit path; on failure the stale credential stays in place so
    /// the next call retries.
    pub async fn valid_credential(&self) -> Result<ServiceCredential, CredentialError> {
        if let Some(credential) = self.fresh() {
            return Ok(credential);
        }

        let _refresh = self.refresh.lock().await;

        if let Some(credential) = self.fresh() {
            tracing::debug!("credential already refreshed by a concurrent caller");
            return Ok(credential);
        }

        tracing::info!("service credential stale, refreshing");
        let credential = self.source.fetch_service_credential().await.map_err(|e| {
            tracing::error!(error = %e, "credential refresh failed");
            CredentialError::Unavailable {
                message: e.to_string(),
            }
        })?;

        *self.current.write() = Some(credential.clone());
        Ok(credential)
    }

    fn fresh(&self) -> Option<ServiceCredential> {
        let now = self.clock.now();
        self.current
            .read()
            .as_ref()
            .filter(|c| c.is_valid_at(now))
            .cloned()
    }
}
