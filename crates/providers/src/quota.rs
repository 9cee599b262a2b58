//! Gemini quota tracking.
//!
//! The authoritative counters live in the `gemini_quota` row; the tracker
//! keeps a short-lived snapshot in memory so that quota checks do not hit
//! the database on every request. The snapshot is best-effort: concurrent
//! requests may both pass a check that only one of them should, and the
//! database increments stay correct either way.

use std::sync::Arc;
use std::time::Duration;

use adforge_core::quota::{
    day_start, minute_start, QuotaDecision, QuotaLimits, QuotaState, RATE_LIMIT_BACKOFF_SECS,
};
use adforge_core::types::Timestamp;
use adforge_db::repositories::QuotaRepo;
use adforge_db::DbPool;
use async_trait::async_trait;
use chrono::TimeDelta;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::ProviderError;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Persistence for the quota counters.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn load(&self) -> Result<QuotaState, ProviderError>;

    async fn record_success(&self, now: Timestamp) -> Result<QuotaState, ProviderError>;

    async fn record_error(
        &self,
        now: Timestamp,
        message: &str,
        blocked_until: Option<Timestamp>,
    ) -> Result<QuotaState, ProviderError>;
}

/// Store backed by the `gemini_quota` table.
pub struct PgQuotaStore {
    pool: DbPool,
}

impl PgQuotaStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for PgQuotaStore {
    async fn load(&self) -> Result<QuotaState, ProviderError> {
        Ok(QuotaRepo::get(&self.pool)
            .await?
            .map(QuotaState::from)
            .unwrap_or_default())
    }

    async fn record_success(&self, now: Timestamp) -> Result<QuotaState, ProviderError> {
        let row = QuotaRepo::record_success(&self.pool, minute_start(now), day_start(now)).await?;
        Ok(row.into())
    }

    async fn record_error(
        &self,
        now: Timestamp,
        message: &str,
        blocked_until: Option<Timestamp>,
    ) -> Result<QuotaState, ProviderError> {
        let row = QuotaRepo::record_error(&self.pool, message, now, blocked_until).await?;
        Ok(row.into())
    }
}

/// In-process store, for tests and database-less runs.
#[derive(Default)]
pub struct MemoryQuotaStore {
    state: Mutex<QuotaState>,
}

impl MemoryQuotaStore {
    pub fn new(state: QuotaState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn load(&self) -> Result<QuotaState, ProviderError> {
        Ok(self.state.lock().await.clone())
    }

    async fn record_success(&self, now: Timestamp) -> Result<QuotaState, ProviderError> {
        let mut state = self.state.lock().await;
        state.record_success(now);
        Ok(state.clone())
    }

    async fn record_error(
        &self,
        now: Timestamp,
        message: &str,
        blocked_until: Option<Timestamp>,
    ) -> Result<QuotaState, ProviderError> {
        let mut state = self.state.lock().await;
        state.record_error(now, message, blocked_until);
        Ok(state.clone())
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

struct Cached {
    state: QuotaState,
    fetched_at: Instant,
}

/// Quota state as reported to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaSnapshot {
    pub state: QuotaState,
    pub limits: QuotaLimits,
    pub decision: QuotaDecision,
}

pub struct QuotaTracker {
    store: Arc<dyn QuotaStore>,
    limits: QuotaLimits,
    ttl: Duration,
    cache: RwLock<Option<Cached>>,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn QuotaStore>, limits: QuotaLimits, ttl: Duration) -> Self {
        Self {
            store,
            limits,
            ttl,
            cache: RwLock::new(None),
        }
    }

    pub fn limits(&self) -> QuotaLimits {
        self.limits
    }

    /// Current counters, from the cache while it is fresh.
    pub async fn state(&self) -> Result<QuotaState, ProviderError> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.state.clone());
            }
        }

        let state = self.store.load().await?;
        self.remember(state.clone()).await;
        Ok(state)
    }

    pub async fn check(&self, now: Timestamp) -> Result<QuotaDecision, ProviderError> {
        Ok(self.state().await?.check(&self.limits, now))
    }

    /// `Ok(())` when one more request may be sent, otherwise
    /// [`ProviderError::QuotaExhausted`].
    pub async fn ensure_available(&self, now: Timestamp) -> Result<(), ProviderError> {
        match self.check(now).await? {
            QuotaDecision::Allowed => Ok(()),
            QuotaDecision::Exhausted { window, retry_at } => {
                tracing::info!(?window, %retry_at, "Gemini quota exhausted");
                Err(ProviderError::QuotaExhausted { window, retry_at })
            }
        }
    }

    pub async fn snapshot(&self, now: Timestamp) -> Result<QuotaSnapshot, ProviderError> {
        let state = self.state().await?;
        let decision = state.check(&self.limits, now);
        Ok(QuotaSnapshot {
            state,
            limits: self.limits,
            decision,
        })
    }

    pub async fn record_success(&self, now: Timestamp) -> Result<QuotaState, ProviderError> {
        let state = self.store.record_success(now).await?;
        self.remember(state.clone()).await;
        Ok(state)
    }

    /// Record a failed call. Rate-limit errors also block further calls for
    /// [`RATE_LIMIT_BACKOFF_SECS`].
    pub async fn record_failure(
        &self,
        now: Timestamp,
        error: &ProviderError,
    ) -> Result<QuotaState, ProviderError> {
        let blocked_until = error
            .is_rate_limited()
            .then(|| now + TimeDelta::seconds(RATE_LIMIT_BACKOFF_SECS));
        let state = self
            .store
            .record_error(now, &error.to_string(), blocked_until)
            .await?;
        self.remember(state.clone()).await;
        Ok(state)
    }

    async fn remember(&self, state: QuotaState) {
        *self.cache.write().await = Some(Cached {
            state,
            fetched_at: Instant::now(),
        });
    }
}
