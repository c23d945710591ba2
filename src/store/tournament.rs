//! Tournament cache store.
//!
//! Same shape as the player store but keyed by group id alone — group
//! metadata has no temporal dimension. Carries an [`insert`]
//! escape hatch for pages that already hold a freshly fetched record.
//!
//! [`insert`]: TournamentStore::insert

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, warn};

use super::coordinator;
use super::subscribers::{SubscriberSet, Subscription};
use crate::service::RatingService;
use crate::telemetry;
use crate::types::{GroupId, TournamentRecord};

/// Shared tournament metadata cache.
///
/// Cheap to clone; clones share entries, service, and subscribers.
#[derive(Clone)]
pub struct TournamentStore {
    entries: Cache<GroupId, TournamentRecord>,
    service: Arc<dyn RatingService>,
    subscribers: SubscriberSet,
}

impl TournamentStore {
    pub(crate) fn new(service: Arc<dyn RatingService>, capacity: Option<u64>) -> Self {
        let mut builder = Cache::builder();
        if let Some(capacity) = capacity {
            builder = builder.max_capacity(capacity);
        }
        Self {
            entries: builder.build(),
            service,
            subscribers: SubscriberSet::new(),
        }
    }

    /// Metadata for a group, if already cached. Never fetches.
    pub fn tournament(&self, id: GroupId) -> Option<TournamentRecord> {
        self.entries.get(&id)
    }

    /// Metadata for several groups, batching the misses into one call.
    ///
    /// The returned map holds only the ids that resolved; failures are
    /// omitted and retried on the next request.
    pub async fn get_or_fetch_many(
        &self,
        ids: &[GroupId],
    ) -> HashMap<GroupId, TournamentRecord> {
        let mut resolved = HashMap::new();
        let mut missing = Vec::new();
        let mut seen = HashSet::new();

        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            match self.entries.get(&id) {
                Some(record) => {
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL, "entity" => "tournament")
                        .increment(1);
                    resolved.insert(id, record);
                }
                None => {
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "entity" => "tournament")
                        .increment(1);
                    missing.push(id);
                }
            }
        }

        if missing.is_empty() {
            return resolved;
        }

        match self.service.fetch_tournaments_batch(&missing).await {
            Ok(envelopes) => {
                let fetched = coordinator::align_batch(&missing, envelopes, "tournament");
                self.merge(fetched.clone());
                resolved.extend(fetched);
            }
            Err(e) => {
                warn!(requested = missing.len(), error = %e, "tournament batch fetch failed");
            }
        }

        resolved
    }

    /// Share an already-fetched record with the cache.
    ///
    /// For pages that loaded tournament metadata directly and want other
    /// consumers to see it without a re-fetch. First write wins: an
    /// existing entry is never overwritten. Returns whether the record
    /// was actually inserted.
    pub fn insert(&self, id: GroupId, record: TournamentRecord) -> bool {
        let fresh = self.entries.entry(id).or_insert(record).is_fresh();
        if fresh {
            debug!(id, "tournament added out of band");
            self.subscribers.notify();
        }
        fresh
    }

    /// Subscribe to store mutations; fires once per merge that inserted
    /// at least one new entry. Dropping the handle unsubscribes.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    /// Number of cached groups.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn merge(&self, fetched: Vec<(GroupId, TournamentRecord)>) {
        let mut inserted = 0;
        for (id, record) in fetched {
            if self.entries.entry(id).or_insert(record).is_fresh() {
                inserted += 1;
            }
        }
        if inserted > 0 {
            debug!(inserted, "tournament cache updated");
            self.subscribers.notify();
        }
    }
}
