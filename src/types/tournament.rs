//! Tournament group metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Federation tournament group id.
pub type GroupId = u64;

/// Metadata for a tournament group.
///
/// Immutable once fetched: group metadata does not change after a
/// tournament is published. Live score changes are a separate concern
/// handled by the refresh controller, not by this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub group_id: GroupId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rounds: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub time_control: Option<String>,
}
