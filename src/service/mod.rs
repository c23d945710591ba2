//! The fetch-service seam between the cache core and the federation API.
//!
//! The cache stores never talk HTTP themselves; they depend on
//! [`RatingService`], injected at bootstrap. [`HttpRatingService`] is the
//! production implementation; tests substitute mocks with call counters.
//!
//! # Failure semantics
//!
//! Batch calls return one [`FetchEnvelope`](crate::types::FetchEnvelope)
//! per requested id, **order-aligned with the input**, so a failed entity
//! does not disturb its siblings. A `Result::Err` from a batch method
//! means the transport itself failed and no element resolved.

mod http;

pub use http::HttpRatingService;

use async_trait::async_trait;

use crate::Result;
use crate::period::RatingPeriod;
use crate::types::{FetchEnvelope, GroupId, PlayerId, PlayerRecord, TournamentRecord};

/// Upstream federation data source.
#[async_trait]
pub trait RatingService: Send + Sync {
    /// Fetch one player's snapshot.
    ///
    /// `period = None` requests the current rating; `Some(period)`
    /// requests the snapshot for that month. Callers pass periods that
    /// have already been normalized — the service does not clamp.
    async fn fetch_player(
        &self,
        id: PlayerId,
        period: Option<RatingPeriod>,
    ) -> Result<FetchEnvelope<PlayerRecord>>;

    /// Fetch current snapshots for several players in one call.
    ///
    /// The returned vector is order-aligned with `ids`.
    async fn fetch_players_batch(
        &self,
        ids: &[PlayerId],
    ) -> Result<Vec<FetchEnvelope<PlayerRecord>>>;

    /// Fetch metadata for several tournament groups in one call.
    ///
    /// The returned vector is order-aligned with `group_ids`.
    async fn fetch_tournaments_batch(
        &self,
        group_ids: &[GroupId],
    ) -> Result<Vec<FetchEnvelope<TournamentRecord>>>;
}
