//! Core data types: upstream records and the fetch envelope.

mod envelope;
mod player;
mod tournament;

pub use envelope::{FetchEnvelope, FetchStatus};
pub use player::{PlayerId, PlayerRecord};
pub use tournament::{GroupId, TournamentRecord};
