//! Portal composition root.
//!
//! The stores are explicitly constructed and dependency-injected rather
//! than living as module-level globals: the application bootstraps one
//! [`Portal`] per page session and hands (clones of) its stores down to
//! consumers. Tests build throwaway portals around mock services.

use std::sync::Arc;

use crate::period::{Clock, SystemClock};
use crate::service::{HttpRatingService, RatingService};
use crate::store::{PlayerStore, TournamentStore};
use crate::{CaissaError, Result};

/// Main entry point for creating portal instances.
pub struct Caissa;

impl Caissa {
    /// Create a new builder for configuring the portal.
    pub fn builder() -> CaissaBuilder {
        CaissaBuilder::new()
    }
}

/// Builder for configuring portal instances.
pub struct CaissaBuilder {
    service: Option<Arc<dyn RatingService>>,
    clock: Arc<dyn Clock>,
    player_capacity: Option<u64>,
    tournament_capacity: Option<u64>,
}

impl CaissaBuilder {
    pub fn new() -> Self {
        Self {
            service: None,
            clock: Arc::new(SystemClock),
            player_capacity: None,
            tournament_capacity: None,
        }
    }

    /// Inject the upstream rating service.
    pub fn service(mut self, service: Arc<dyn RatingService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Use the HTTP federation API at `base_url` as the rating service.
    pub fn federation_url(mut self, base_url: impl Into<String>) -> Self {
        self.service = Some(Arc::new(HttpRatingService::with_base_url(base_url)));
        self
    }

    /// Override the wall clock (tests pin "now" to make period
    /// normalization deterministic).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bound the player cache to at most `capacity` entries (LRU).
    ///
    /// Unbounded by default: entries live for the whole session, which
    /// matches the portal's single-page-session lifecycle. Opt in for
    /// long-lived sessions.
    pub fn player_capacity(mut self, capacity: u64) -> Self {
        self.player_capacity = Some(capacity);
        self
    }

    /// Bound the tournament cache to at most `capacity` entries (LRU).
    pub fn tournament_capacity(mut self, capacity: u64) -> Self {
        self.tournament_capacity = Some(capacity);
        self
    }

    /// Build the portal.
    ///
    /// Fails with [`CaissaError::NoService`] when no rating service was
    /// configured.
    pub fn build(self) -> Result<Portal> {
        let service = self.service.ok_or(CaissaError::NoService)?;

        Ok(Portal {
            players: PlayerStore::new(
                Arc::clone(&service),
                Arc::clone(&self.clock),
                self.player_capacity,
            ),
            tournaments: TournamentStore::new(service, self.tournament_capacity),
        })
    }
}

impl Default for CaissaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-session cache portal: one player store, one tournament store.
///
/// Stores are cheap clones over shared state, so consumers may hold
/// their own copies.
pub struct Portal {
    players: PlayerStore,
    tournaments: TournamentStore,
}

impl Portal {
    pub fn players(&self) -> &PlayerStore {
        &self.players
    }

    pub fn tournaments(&self) -> &TournamentStore {
        &self.tournaments
    }
}
