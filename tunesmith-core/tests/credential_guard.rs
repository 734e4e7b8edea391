//! Integration tests for the shared credential guard.
//!
//! These tests verify that the CredentialGuard correctly:
//! - Serves concurrent callers from the cached credential while it is fresh
//! - Collapses concurrent stale callers into exactly one refresh
//! - Leaves the stale credential in place when a refresh fails

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tunesmith_core::{
    clock::{Clock, ManualClock},
    credential::{CredentialSource, ServiceCredential},
    guard::CredentialGuard,
    oauth::AuthError,
};

/// Source that counts exchanges and holds each one open briefly so
/// concurrent callers genuinely overlap.
struct SlowSource {
    calls: AtomicUsize,
    clock: Arc<ManualClock>,
}

impl SlowSource {
    fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            clock,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for SlowSource {
    async fn fetch_service_credential(&self) -> Result<ServiceCredential, AuthError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        Ok(ServiceCredential::new(
            format!("token-{}", n),
            self.clock.now() + Duration::seconds(3600),
        ))
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

async fn join_all_credentials(
    guard: &Arc<CredentialGuard>,
    callers: usize,
) -> Vec<ServiceCredential> {
    let mut handles = Vec::with_capacity(callers);
    for _ in 0..callers {
        let guard = Arc::clone(guard);
        handles.push(tokio::spawn(
            async move { guard.valid_credential().await },
        ));
    }

    let mut credentials = Vec::with_capacity(callers);
    for handle in handles {
        credentials.push(handle.await.unwrap().unwrap());
    }
    credentials
}

#[tokio::test]
async fn test_concurrent_callers_on_fresh_credential_trigger_no_refresh() {
    let clock = Arc::new(ManualClock::new(start()));
    let source = Arc::new(SlowSource::new(clock.clone()));
    let guard = Arc::new(CredentialGuard::with_clock(source.clone(), clock.clone()));

    guard.initialize().await.unwrap();
    assert_eq!(source.calls(), 1);

    let credentials = join_all_credentials(&guard, 8).await;

    assert_eq!(source.calls(), 1);
    assert!(
        credentials
            .iter()
            .all(|c| c.access_token.expose() == "token-0")
    );
}

#[tokio::test]
async fn test_concurrent_callers_on_stale_credential_trigger_one_refresh() {
    let clock = Arc::new(ManualClock::new(start()));
    let source = Arc::new(SlowSource::new(clock.clone()));
    let guard = Arc::new(CredentialGuard::with_clock(source.clone(), clock.clone()));

    guard.initialize().await.unwrap();
    clock.advance(Duration::seconds(7200));
    assert!(!guard.is_valid());

    let credentials = join_all_credentials(&guard, 8).await;

    // one initialization plus exactly one refresh, regardless of caller count
    assert_eq!(source.calls(), 2);
    assert!(
        credentials
            .iter()
            .all(|c| c.access_token.expose() == "token-1")
    );
}

#[tokio::test]
async fn test_refresh_failure_surfaces_and_next_call_retries() {
    struct FlakySource {
        calls: AtomicUsize,
        clock: Arc<ManualClock>,
    }

    #[async_trait]
    impl CredentialSource for FlakySource {
        async fn fetch_service_credential(&self) -> Result<ServiceCredential, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            // second exchange (the first refresh attempt) fails
            if n == 1 {
                return Err(AuthError::ExchangeFailed {
                    message: "token endpoint unreachable".to_string(),
                });
            }
            Ok(ServiceCredential::new(
                format!("token-{}", n),
                self.clock.now() + Duration::seconds(3600),
            ))
        }
    }

    let clock = Arc::new(ManualClock::new(start()));
    let source = Arc::new(FlakySource {
        calls: AtomicUsize::new(0),
        clock: clock.clone(),
    });
    let guard = CredentialGuard::with_clock(source.clone(), clock.clone());

    guard.initialize().await.unwrap();
    clock.advance(Duration::seconds(7200));

    let failed = guard.valid_credential().await;
    assert!(failed.is_err());

    // the lock was released on the failure path; this call retries
    let credential = guard.valid_credential().await.unwrap();
    assert_eq!(credential.access_token.expose(), "token-2");
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}
