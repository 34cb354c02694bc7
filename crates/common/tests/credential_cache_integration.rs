//! Integration tests for the credential cache
//!
//! Exercises the cache from many tasks on a multi-threaded runtime, with a
//! fetcher that can be held open so callers pile up behind one refresh.

#![cfg(feature = "test-utils")]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_test::{assert_err, assert_ok};
use wxwork_common::testing::MockClock;
use wxwork_common::{CredentialCache, IssuedToken, TokenFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchError(String);

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fetch failed: {}", self.0)
    }
}

impl std::error::Error for FetchError {}

/// Fetcher that blocks until the test releases it
struct GatedFetcher {
    gate: Semaphore,
    calls: AtomicUsize,
    fail: AtomicBool,
    lifetime: Duration,
}

impl GatedFetcher {
    fn new(lifetime: Duration) -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            lifetime,
        }
    }

    fn release(&self, permits: usize) {
        self.gate.add_permits(permits);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenFetcher for GatedFetcher {
    type Error = FetchError;

    async fn fetch_token(&self) -> Result<IssuedToken, FetchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let permit = self.gate.acquire().await.map_err(|e| FetchError(e.to_string()))?;
        permit.forget();
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError(format!("attempt {n} rejected")));
        }
        Ok(IssuedToken::new(format!("token-{n}"), self.lifetime))
    }
}

async fn hammer(
    cache: &Arc<CredentialCache<Arc<GatedFetcher>, MockClock>>,
    fetcher: &GatedFetcher,
    callers: usize,
) -> Vec<Result<String, FetchError>> {
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let cache = Arc::clone(cache);
            tokio::spawn(async move { cache.ensure_token().await })
        })
        .collect();

    // Let every task reach the cache before the refresh is allowed to finish.
    tokio::time::sleep(Duration::from_millis(50)).await;
    fetcher.release(callers);

    join_all(handles).await.into_iter().map(|joined| joined.expect("task panicked")).collect()
}

/// Concurrent callers on an empty cache share a single refresh.
///
/// # Test Steps
/// 1. Spawn 32 tasks calling `ensure_token` while the fetcher is held
/// 2. Release the fetcher
/// 3. Verify the token endpoint was called once
/// 4. Verify every caller received the same token
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_refresh() {
    let fetcher = Arc::new(GatedFetcher::new(Duration::from_secs(7200)));
    let cache = Arc::new(CredentialCache::with_clock(Arc::clone(&fetcher), MockClock::new()));

    let results = hammer(&cache, &fetcher, 32).await;

    assert_eq!(fetcher.calls(), 1);
    for result in results {
        assert_eq!(assert_ok!(result), "token-1");
    }
}

/// Concurrent callers waiting on a failed refresh all see that failure.
///
/// # Test Steps
/// 1. Make the fetcher fail
/// 2. Spawn 16 concurrent callers on an empty cache
/// 3. Verify exactly one fetch happened and every caller got its error
/// 4. Verify a later call starts a fresh refresh that can succeed
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_failure() {
    let fetcher = Arc::new(GatedFetcher::new(Duration::from_secs(7200)));
    fetcher.fail.store(true, Ordering::SeqCst);
    let cache = Arc::new(CredentialCache::with_clock(Arc::clone(&fetcher), MockClock::new()));

    let results = hammer(&cache, &fetcher, 16).await;

    assert_eq!(fetcher.calls(), 1);
    for result in results {
        assert_eq!(assert_err!(result), FetchError("attempt 1 rejected".into()));
    }

    fetcher.fail.store(false, Ordering::SeqCst);
    fetcher.release(1);
    assert_eq!(assert_ok!(cache.ensure_token().await), "token-2");
    assert_eq!(fetcher.calls(), 2);
}

/// After invalidation, concurrent callers again trigger exactly one refresh.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_one_refresh_per_invalidation() {
    let fetcher = Arc::new(GatedFetcher::new(Duration::from_secs(7200)));
    let cache = Arc::new(CredentialCache::with_clock(Arc::clone(&fetcher), MockClock::new()));

    hammer(&cache, &fetcher, 8).await;
    cache.invalidate().await;
    let results = hammer(&cache, &fetcher, 8).await;

    assert_eq!(fetcher.calls(), 2);
    assert!(results.into_iter().all(|r| r.as_deref() == Ok("token-2")));
}

/// A valid token is served without touching the fetcher again.
#[tokio::test]
async fn test_valid_token_needs_no_network() {
    let fetcher = Arc::new(GatedFetcher::new(Duration::from_secs(10)));
    let clock = MockClock::new();
    let cache = CredentialCache::with_clock(Arc::clone(&fetcher), clock.clone());

    fetcher.release(1);
    assert_ok!(cache.ensure_token().await);

    for _ in 0..100 {
        clock.advance(Duration::from_millis(50));
        assert_eq!(assert_ok!(cache.ensure_token().await), "token-1");
    }
    assert_eq!(fetcher.calls(), 1);

    let state = cache.token_state().await;
    assert!(state.usable);
    assert_eq!(state.remaining, Some(Duration::from_secs(5)));
}
