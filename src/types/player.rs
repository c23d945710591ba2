//! Player rating snapshots.

use serde::{Deserialize, Serialize};

/// Federation player id.
pub type PlayerId = u64;

/// A player's identity and rating state as of one rating period.
///
/// Treated as immutable once cached: a historical rating for a past month
/// does not change, so an entry is never re-fetched or overwritten.
/// Unknown or unrated fields are absent rather than zeroed — the upstream
/// omits them for untitled or inactive players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub federation: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Standard (classical) rating for the snapshot's period.
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub rapid_rating: Option<u32>,
    #[serde(default)]
    pub blitz_rating: Option<u32>,
    #[serde(default)]
    pub birth_year: Option<i32>,
}
