//! Cache stores and batch coordination.
//!
//! Two append-only stores share one pattern: synchronous getters that
//! never fetch, async get-or-fetch operations that batch their misses,
//! and a subscriber set notified once per merge.
//!
//! - [`PlayerStore`] — keyed by `(player id, rating period)`; arbitrary
//!   lookup dates are normalized to their month before touching the map.
//! - [`TournamentStore`] — keyed by group id alone; no temporal
//!   dimension, plus a first-write-wins escape hatch for records fetched
//!   elsewhere.
//!
//! Both are unbounded by default, preserving session-lifetime semantics;
//! a capacity passed at bootstrap opts into LRU eviction for long-lived
//! sessions.

mod coordinator;
mod player;
mod subscribers;
mod tournament;

pub use player::PlayerStore;
pub use subscribers::Subscription;
pub use tournament::TournamentStore;
