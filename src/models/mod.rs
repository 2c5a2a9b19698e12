//! Data structures for the cricket admin: teams, matches, tournament store.

mod game;
mod team;
mod tournament;

pub use game::{ActiveMatch, KnockoutStage, MatchCategory, MatchId, MatchState};
pub use team::{Group, Team, TeamId};
pub use tournament::{CricketStore, StoreError, Tournament};
