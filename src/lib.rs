//! Caissa - temporal cache core for a chess tournament results portal
//!
//! This crate is the data layer of a results portal that proxies a
//! third-party federation API: a session-scoped cache of player rating
//! snapshots keyed by `(player id, calendar month)`, a tournament
//! metadata cache, batched/deduplicated fetching for both, and a
//! cancellable live-results refresh loop. Ratings are monthly snapshots,
//! so arbitrary lookup dates are normalized to their rating period —
//! with future months falling back to the current one, since the
//! upstream has no data for months that have not been reached.
//!
//! # Example
//!
//! ```rust,no_run
//! use caissa::Caissa;
//! use chrono::{Local, TimeZone};
//!
//! #[tokio::main]
//! async fn main() -> caissa::Result<()> {
//!     let portal = Caissa::builder()
//!         .federation_url("https://api.caissa-portal.org")
//!         .build()?;
//!
//!     // Batched: one network call for the distinct misses.
//!     let players = portal.players().get_or_fetch_many(&[1503014, 623539]).await;
//!     for (id, player) in &players {
//!         println!("{id}: {} ({:?})", player.name, player.rating);
//!     }
//!
//!     // Historical: any date within a month hits the same cached entry.
//!     let game_date = Local.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
//!     let snapshot = portal.players().get_or_fetch_at(1503014, game_date).await;
//!     println!("{snapshot:?}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod period;
pub mod portal;
pub mod refresh;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{CaissaError, Result};
pub use period::{Clock, PlayerKey, RatingPeriod, SystemClock, normalized_period};
pub use portal::{Caissa, CaissaBuilder, Portal};
pub use refresh::{LiveRefresh, RefreshConfig};
pub use service::{HttpRatingService, RatingService};
pub use store::{PlayerStore, Subscription, TournamentStore};
pub use types::{
    FetchEnvelope, FetchStatus, GroupId, PlayerId, PlayerRecord, TournamentRecord,
};
