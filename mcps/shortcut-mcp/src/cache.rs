//! Reference-data cache
//!
//! Holds TTL-bounded snapshots of the current member, the workflow list and
//! the member directory. Each slot is filled lazily on first use and
//! refetched once its snapshot is older than the TTL. There is no explicit
//! invalidation, so changes made outside this server are picked up only
//! after expiry.
//!
//! Slot locks are never held across the upstream fetch. Two callers missing
//! at the same time both fetch, and the later write wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::shortcut::{ApiClient, ShortcutResult};
use crate::types::{CurrentMember, Member, Workflow};

/// Source of the current time, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A snapshot and the time it was fetched
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub data: Arc<T>,
    pub fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn is_valid(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

type Slot<T> = Mutex<Option<CacheEntry<T>>>;

/// Owns the three reference-data slots
pub struct ReferenceCache {
    client: ApiClient,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    current_member: Slot<CurrentMember>,
    workflows: Slot<Vec<Workflow>>,
    members: Slot<Vec<Member>>,
}

impl ReferenceCache {
    pub fn new(client: ApiClient, ttl: Duration) -> Self {
        Self::with_clock(client, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(client: ApiClient, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            ttl,
            clock,
            current_member: Mutex::new(None),
            workflows: Mutex::new(None),
            members: Mutex::new(None),
        }
    }

    /// The member that owns the API token
    pub async fn current_member(&self) -> ShortcutResult<Arc<CurrentMember>> {
        self.get_or_fetch(&self.current_member, "/member").await
    }

    /// All workflows, in API order
    pub async fn workflows(&self) -> ShortcutResult<Arc<Vec<Workflow>>> {
        self.get_or_fetch(&self.workflows, "/workflows").await
    }

    /// The member directory
    pub async fn members(&self) -> ShortcutResult<Arc<Vec<Member>>> {
        self.get_or_fetch(&self.members, "/members").await
    }

    async fn get_or_fetch<T>(&self, slot: &Slot<T>, path: &str) -> ShortcutResult<Arc<T>>
    where
        T: DeserializeOwned,
    {
        {
            let guard = slot.lock().await;
            if let Some(entry) = guard.as_ref() {
                if entry.is_valid(self.clock.now(), self.ttl) {
                    debug!(path, "reference cache hit");
                    return Ok(entry.data.clone());
                }
                debug!(path, "reference cache expired");
            } else {
                debug!(path, "reference cache miss");
            }
        }

        let data: Arc<T> = Arc::new(self.client.get_as(path).await?);

        *slot.lock().await = Some(CacheEntry {
            data: data.clone(),
            fetched_at: self.clock.now(),
        });

        Ok(data)
    }
}
