//! Batch request coordination.
//!
//! Turns "N requested keys, M of which are already cached" into at most
//! one round of network activity for the misses. The helpers here are
//! deliberately free functions: the stores own the maps, the coordinator
//! owns partitioning, concurrent settlement, and per-entity failure
//! isolation.
//!
//! A failed entity is logged and skipped — it stays a future cache miss
//! and never aborts sibling fetches. There is no negative caching;
//! transient upstream failures are retried on the next request that
//! needs the key.

use std::collections::HashSet;
use std::fmt::Display;

use futures_util::future::join_all;
use tracing::warn;

use crate::period::PlayerKey;
use crate::service::RatingService;
use crate::telemetry;
use crate::types::{FetchEnvelope, PlayerRecord};

/// Partition requested keys into cache hits and distinct misses.
///
/// Duplicate keys are collapsed (two requests normalizing to the same key
/// issue one fetch). Returns the number of distinct keys that were
/// already cached plus the miss list in first-seen order.
pub(crate) fn distinct_misses(
    keys: impl IntoIterator<Item = PlayerKey>,
    is_cached: impl Fn(&PlayerKey) -> bool,
) -> (usize, Vec<PlayerKey>) {
    let mut seen = HashSet::new();
    let mut hits = 0;
    let mut misses = Vec::new();
    for key in keys {
        if !seen.insert(key) {
            continue;
        }
        if is_cached(&key) {
            hits += 1;
        } else {
            misses.push(key);
        }
    }
    (hits, misses)
}

/// Fetch period-specific player snapshots for every missing key.
///
/// One service call per distinct key, awaited concurrently with
/// independent settlement: each element resolves or fails on its own and
/// failures are dropped from the result.
pub(crate) async fn fetch_periods(
    service: &dyn RatingService,
    misses: &[PlayerKey],
) -> Vec<(PlayerKey, PlayerRecord)> {
    let fetches = misses.iter().map(|key| async move {
        match service.fetch_player(key.id, Some(key.period)).await {
            Ok(envelope) => settle(key.id, envelope, "player").map(|record| (*key, record)),
            Err(e) => {
                warn!(id = key.id, period = %key.period, error = %e, "player fetch failed");
                metrics::counter!(telemetry::FETCHES_TOTAL,
                    "entity" => "player", "status" => "error")
                .increment(1);
                None
            }
        }
    });

    join_all(fetches).await.into_iter().flatten().collect()
}

/// Pair an order-aligned batch response back up with the requested ids.
///
/// Per-element failures (error envelopes, missing payloads) are logged
/// and skipped. A response shorter than the request simply leaves the
/// tail ids unresolved.
pub(crate) fn align_batch<I, T>(
    ids: &[I],
    envelopes: Vec<FetchEnvelope<T>>,
    entity: &'static str,
) -> Vec<(I, T)>
where
    I: Copy + Display,
{
    if envelopes.len() != ids.len() {
        warn!(
            entity,
            requested = ids.len(),
            received = envelopes.len(),
            "batch response not aligned with request"
        );
    }

    ids.iter()
        .zip(envelopes)
        .filter_map(|(&id, envelope)| settle(id, envelope, entity).map(|record| (id, record)))
        .collect()
}

/// Collapse one envelope to its payload, logging and metering failures.
fn settle<I: Display, T>(id: I, envelope: FetchEnvelope<T>, entity: &'static str) -> Option<T> {
    match envelope.into_result() {
        Ok(record) => {
            metrics::counter!(telemetry::FETCHES_TOTAL, "entity" => entity, "status" => "ok")
                .increment(1);
            Some(record)
        }
        Err(e) => {
            warn!(entity, %id, error = %e, "upstream returned no record");
            metrics::counter!(telemetry::FETCHES_TOTAL, "entity" => entity, "status" => "error")
                .increment(1);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::RatingPeriod;

    fn key(id: u64, month: u32) -> PlayerKey {
        PlayerKey::new(id, RatingPeriod::new(2026, month))
    }

    #[test]
    fn duplicate_keys_collapse_to_one_miss() {
        let (hits, misses) = distinct_misses([key(7, 3), key(7, 3), key(8, 3)], |_| false);
        assert_eq!(hits, 0);
        assert_eq!(misses, vec![key(7, 3), key(8, 3)]);
    }

    #[test]
    fn cached_keys_are_not_refetched() {
        let (hits, misses) =
            distinct_misses([key(7, 3), key(8, 3)], |k| k.id == 7);
        assert_eq!(hits, 1);
        assert_eq!(misses, vec![key(8, 3)]);
    }

    #[test]
    fn align_batch_drops_error_envelopes() {
        let envelopes = vec![
            FetchEnvelope::ok("a"),
            FetchEnvelope::<&str>::error("not found"),
            FetchEnvelope::ok("c"),
        ];
        let resolved = align_batch(&[1u64, 2, 3], envelopes, "player");
        assert_eq!(resolved, vec![(1, "a"), (3, "c")]);
    }

    #[test]
    fn align_batch_tolerates_short_responses() {
        let envelopes = vec![FetchEnvelope::ok("a")];
        let resolved = align_batch(&[1u64, 2], envelopes, "tournament");
        assert_eq!(resolved, vec![(1, "a")]);
    }
}
