//! Player cache store.
//!
//! Process-wide store of resolved player snapshots keyed by
//! `(player id, rating period)`. Reads are synchronous and never touch
//! the network; the async get-or-fetch operations batch the misses
//! through the coordinator. Entries are append-only: once a key resolves
//! it is served from memory for the rest of the session and is never
//! overwritten (a historical rating for a past month does not change).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Local};
use moka::sync::Cache;
use tracing::{debug, warn};

use super::coordinator;
use super::subscribers::{SubscriberSet, Subscription};
use crate::period::{Clock, PlayerKey, RatingPeriod, normalized_period};
use crate::service::RatingService;
use crate::telemetry;
use crate::types::{FetchEnvelope, PlayerId, PlayerRecord};

/// Shared player snapshot cache.
///
/// Cheap to clone; clones share the same entries, service, and
/// subscriber set. Constructed once at bootstrap by
/// [`CaissaBuilder`](crate::CaissaBuilder) and handed to every consumer.
#[derive(Clone)]
pub struct PlayerStore {
    entries: Cache<PlayerKey, PlayerRecord>,
    service: Arc<dyn RatingService>,
    clock: Arc<dyn Clock>,
    subscribers: SubscriberSet,
}

impl PlayerStore {
    pub(crate) fn new(
        service: Arc<dyn RatingService>,
        clock: Arc<dyn Clock>,
        capacity: Option<u64>,
    ) -> Self {
        let mut builder = Cache::builder();
        if let Some(capacity) = capacity {
            builder = builder.max_capacity(capacity);
        }
        Self {
            entries: builder.build(),
            service,
            clock,
            subscribers: SubscriberSet::new(),
        }
    }

    fn current_period(&self) -> RatingPeriod {
        RatingPeriod::containing(self.clock.now())
    }

    fn key_for(&self, id: PlayerId, instant: DateTime<Local>) -> PlayerKey {
        PlayerKey::new(id, normalized_period(instant, self.clock.as_ref()))
    }

    /// Current-period snapshot for `id`, if already cached.
    ///
    /// Synchronous and safe to call during render; never fetches.
    pub fn player(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.entries.get(&PlayerKey::new(id, self.current_period()))
    }

    /// Snapshot for `id` as of `instant`, if already cached.
    ///
    /// The instant is normalized to its rating period first, so any date
    /// within a cached month hits the same entry.
    pub fn player_at(&self, id: PlayerId, instant: DateTime<Local>) -> Option<PlayerRecord> {
        self.entries.get(&self.key_for(id, instant))
    }

    /// Current-period snapshot for `id`, fetching on miss.
    ///
    /// Returns `None` when the player is not cached and the fetch fails;
    /// the miss is retried on the next call.
    pub async fn get_or_fetch(&self, id: PlayerId) -> Option<PlayerRecord> {
        let key = PlayerKey::new(id, self.current_period());
        if let Some(record) = self.entries.get(&key) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "entity" => "player").increment(1);
            return Some(record);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "entity" => "player").increment(1);

        // Current lookup: no date on the wire, stored under today's period.
        match self
            .service
            .fetch_player(id, None)
            .await
            .and_then(FetchEnvelope::into_result)
        {
            Ok(record) => {
                metrics::counter!(telemetry::FETCHES_TOTAL,
                    "entity" => "player", "status" => "ok")
                .increment(1);
                self.merge(vec![(key, record.clone())]);
                Some(record)
            }
            Err(e) => {
                warn!(id, error = %e, "player fetch failed");
                metrics::counter!(telemetry::FETCHES_TOTAL,
                    "entity" => "player", "status" => "error")
                .increment(1);
                None
            }
        }
    }

    /// Current-period snapshots for several players, batching the misses
    /// into one service call.
    ///
    /// The returned map holds only the ids that resolved (cached or
    /// freshly fetched); failed ids are omitted, not error-mapped.
    pub async fn get_or_fetch_many(&self, ids: &[PlayerId]) -> HashMap<PlayerId, PlayerRecord> {
        let period = self.current_period();
        let mut resolved = HashMap::new();
        let mut missing = Vec::new();
        let mut seen = HashSet::new();

        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            match self.entries.get(&PlayerKey::new(id, period)) {
                Some(record) => {
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL, "entity" => "player")
                        .increment(1);
                    resolved.insert(id, record);
                }
                None => {
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "entity" => "player")
                        .increment(1);
                    missing.push(id);
                }
            }
        }

        if missing.is_empty() {
            return resolved;
        }

        match self.service.fetch_players_batch(&missing).await {
            Ok(envelopes) => {
                let fetched = coordinator::align_batch(&missing, envelopes, "player");
                self.merge(
                    fetched
                        .iter()
                        .map(|(id, record)| (PlayerKey::new(*id, period), record.clone()))
                        .collect(),
                );
                resolved.extend(fetched);
            }
            Err(e) => {
                warn!(requested = missing.len(), error = %e, "player batch fetch failed");
            }
        }

        resolved
    }

    /// Snapshot for `id` as of `instant`, fetching on miss.
    pub async fn get_or_fetch_at(
        &self,
        id: PlayerId,
        instant: DateTime<Local>,
    ) -> Option<PlayerRecord> {
        self.resolve_periods(&[(id, instant)]).await;
        self.player_at(id, instant)
    }

    /// Resolve a heterogeneous set of `(id, date)` pairs, e.g. one per
    /// game, each needing the rating as of its own date.
    ///
    /// Side effect only: requests are normalized, deduplicated by key,
    /// and the misses fetched concurrently; callers read the results back
    /// through [`player_at`](Self::player_at). Already-cached requests
    /// trigger no network activity and no notification.
    pub async fn resolve_periods(&self, requests: &[(PlayerId, DateTime<Local>)]) {
        let keys = requests
            .iter()
            .map(|&(id, instant)| self.key_for(id, instant));
        let (hits, misses) = coordinator::distinct_misses(keys, |key| self.entries.contains_key(key));

        metrics::counter!(telemetry::CACHE_HITS_TOTAL, "entity" => "player")
            .increment(hits as u64);
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "entity" => "player")
            .increment(misses.len() as u64);

        if misses.is_empty() {
            return;
        }

        let fetched = coordinator::fetch_periods(self.service.as_ref(), &misses).await;
        self.merge(fetched);
    }

    /// Subscribe to store mutations.
    ///
    /// The callback fires once per merge that inserted at least one new
    /// entry. Dropping the handle unsubscribes.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    /// Number of cached `(player, period)` entries.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First-write-wins merge; notifies subscribers when anything new
    /// landed. A racing duplicate first fetch loses quietly: its record
    /// is dropped, not overwritten.
    fn merge(&self, fetched: Vec<(PlayerKey, PlayerRecord)>) {
        let mut inserted = 0;
        for (key, record) in fetched {
            if self.entries.entry(key).or_insert(record).is_fresh() {
                inserted += 1;
            }
        }
        if inserted > 0 {
            debug!(inserted, "player cache updated");
            self.subscribers.notify();
        }
    }
}
