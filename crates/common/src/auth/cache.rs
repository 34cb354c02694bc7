//! Credential cache with single-flight refresh
//!
//! Callers go through [`CredentialCache::ensure_token`]:
//! 1. Read the cached token under the shared lock; return it if usable.
//! 2. Otherwise take the refresh mutex.
//! 3. Re-check under the mutex, since another caller may have refreshed
//!    while this one waited.
//! 4. Still unusable: call the fetcher, store the outcome, release.
//!
//! Each completed refresh bumps a generation counter. A waiter that queued
//! behind a refresh sees the generation move and, if that refresh failed,
//! returns the same error instead of starting another one. Later callers
//! start from scratch, so a failure never sticks.

use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::traits::TokenFetcher;
use super::types::{CachedToken, TokenState};
use crate::time::{Clock, SystemClock};

struct CacheState<E> {
    token: CachedToken,
    generation: u64,
    last_failure: Option<E>,
}

/// Owner of one application's access token
pub struct CredentialCache<F: TokenFetcher, C: Clock = SystemClock> {
    fetcher: F,
    clock: C,
    state: RwLock<CacheState<F::Error>>,
    refresh_lock: Mutex<()>,
}

impl<F: TokenFetcher> CredentialCache<F, SystemClock> {
    /// Create an empty cache; the first `ensure_token` triggers a refresh.
    pub fn new(fetcher: F) -> Self {
        Self::with_clock(fetcher, SystemClock)
    }
}

impl<F: TokenFetcher, C: Clock> CredentialCache<F, C> {
    /// Create an empty cache that reads time from `clock`.
    pub fn with_clock(fetcher: F, clock: C) -> Self {
        Self {
            fetcher,
            clock,
            state: RwLock::new(CacheState {
                token: CachedToken::empty(),
                generation: 0,
                last_failure: None,
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Return a usable token, refreshing first if needed.
    ///
    /// # Errors
    /// Returns the fetcher's error when the refresh this call started, or the
    /// refresh it waited on, failed.
    pub async fn ensure_token(&self) -> Result<String, F::Error> {
        let observed = {
            let state = self.state.read().await;
            if state.token.is_usable(self.clock.now()) {
                return Ok(state.token.access_token.clone());
            }
            state.generation
        };

        let _refresh = self.refresh_lock.lock().await;

        {
            let state = self.state.read().await;
            if state.token.is_usable(self.clock.now()) {
                debug!("access token refreshed by another caller");
                return Ok(state.token.access_token.clone());
            }
            if state.generation != observed {
                if let Some(err) = &state.last_failure {
                    debug!(error = %err, "sharing failure of concurrent refresh");
                    return Err(err.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Drop the cached token so the next `ensure_token` refreshes.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        if state.token.is_present() {
            info!("access token invalidated");
        }
        state.token = CachedToken::empty();
    }

    /// Snapshot of the cached token for diagnostics; never triggers a refresh.
    pub async fn token_state(&self) -> TokenState {
        let now = self.clock.now();
        let state = self.state.read().await;
        TokenState {
            has_token: state.token.is_present(),
            usable: state.token.is_usable(now),
            remaining: state.token.remaining(now),
            refresh_count: state.generation,
        }
    }

    /// Deadline of the cached token, if one is held
    pub async fn expires_at(&self) -> Option<Instant> {
        let state = self.state.read().await;
        state.token.expires_at.filter(|_| state.token.is_present())
    }

    /// The token source this cache refreshes from.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Must be called with `refresh_lock` held.
    async fn refresh(&self) -> Result<String, F::Error> {
        debug!("refreshing access token");
        let outcome = self.fetcher.fetch_token().await;
        let now = self.clock.now();

        let mut state = self.state.write().await;
        state.generation += 1;

        match outcome {
            Ok(issued) => {
                let lifetime = issued.expires_in;
                state.token = CachedToken::from_issued(issued, now);
                state.last_failure = None;
                info!(
                    expires_in_secs = lifetime.as_secs(),
                    token_len = state.token.access_token.len(),
                    generation = state.generation,
                    "access token refreshed"
                );
                Ok(state.token.access_token.clone())
            }
            Err(err) => {
                warn!(error = %err, generation = state.generation, "access token refresh failed");
                state.last_failure = Some(err.clone());
                Err(err)
            }
        }
    }
}
