//! Tournament store: roster plus the active-match slot.

use crate::models::game::{ActiveMatch, MatchCategory, MatchState};
use crate::models::team::{Group, Team, TeamId};
use serde::{Deserialize, Serialize};

/// Errors that can occur when mutating the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// A match is already in progress; it must be ended first.
    MatchInProgress,
    /// Team id is not on the roster.
    UnknownTeam(TeamId),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::MatchInProgress => write!(f, "A match is already in progress"),
            StoreError::UnknownTeam(id) => write!(f, "Unknown team: {}", id),
        }
    }
}

/// What the match setup form needs from whoever owns teams and match state.
pub trait CricketStore {
    /// Full roster, in roster order.
    fn teams(&self) -> &[Team];

    /// Current match, if one is in progress.
    fn current_match(&self) -> Option<&ActiveMatch>;

    /// Create the active match.
    fn start_match(
        &mut self,
        group: Group,
        team_1_id: &str,
        team_2_id: &str,
        category: MatchCategory,
    ) -> Result<&ActiveMatch, StoreError>;

    fn team(&self, id: &str) -> Option<Team> {
        self.teams().iter().find(|t| t.id == id).cloned()
    }

    /// Teams of one group, in roster order.
    fn teams_by_group(&self, group: Group) -> Vec<Team> {
        self.teams()
            .iter()
            .filter(|t| t.group == group)
            .cloned()
            .collect()
    }
}

/// In-memory tournament: teams and the match slot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tournament {
    pub teams: Vec<Team>,
    pub match_state: MatchState,
}

impl Tournament {
    /// Create a tournament with the given roster and no match in progress.
    pub fn with_teams(teams: Vec<Team>) -> Self {
        Self {
            teams,
            match_state: MatchState::default(),
        }
    }

    /// Clear the active match (scorer finished or abandoned it). Returns the match that was cleared.
    pub fn end_match(&mut self) -> Option<ActiveMatch> {
        let ended = self.match_state.current_match.take();
        if let Some(m) = &ended {
            log::info!(
                "Ended {} ({} vs {})",
                m.category.label(),
                m.team_1_id,
                m.team_2_id
            );
        }
        ended
    }

    fn require_team(&self, id: &str) -> Result<(), StoreError> {
        if self.teams.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(StoreError::UnknownTeam(id.to_string()))
        }
    }
}

impl CricketStore for Tournament {
    fn teams(&self) -> &[Team] {
        &self.teams
    }

    fn current_match(&self) -> Option<&ActiveMatch> {
        self.match_state.current_match.as_ref()
    }

    fn start_match(
        &mut self,
        group: Group,
        team_1_id: &str,
        team_2_id: &str,
        category: MatchCategory,
    ) -> Result<&ActiveMatch, StoreError> {
        if self.match_state.current_match.is_some() {
            return Err(StoreError::MatchInProgress);
        }
        self.require_team(team_1_id)?;
        self.require_team(team_2_id)?;
        log::info!(
            "Started {} ({} vs {}, group {})",
            category.label(),
            team_1_id,
            team_2_id,
            group
        );
        let m = ActiveMatch::new(group, team_1_id.to_string(), team_2_id.to_string(), category);
        Ok(&*self.match_state.current_match.insert(m))
    }
}
