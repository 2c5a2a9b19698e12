//! Match categories and the active match.

use crate::models::team::{Group, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Stage of the tournament a match is played in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    #[default]
    Group,
    SemiFinal1,
    SemiFinal2,
    Final,
}

impl MatchCategory {
    /// Label shown to the operator.
    pub fn label(self) -> &'static str {
        match self {
            MatchCategory::Group => "Group Match",
            MatchCategory::SemiFinal1 => "Semi Final 1",
            MatchCategory::SemiFinal2 => "Semi Final 2",
            MatchCategory::Final => "Final",
        }
    }

    pub fn is_knockout(self) -> bool {
        self != MatchCategory::Group
    }
}

/// Knockout subset of [`MatchCategory`]; what the knockout tab can pick.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutStage {
    #[default]
    SemiFinal1,
    SemiFinal2,
    Final,
}

impl From<KnockoutStage> for MatchCategory {
    fn from(stage: KnockoutStage) -> Self {
        match stage {
            KnockoutStage::SemiFinal1 => MatchCategory::SemiFinal1,
            KnockoutStage::SemiFinal2 => MatchCategory::SemiFinal2,
            KnockoutStage::Final => MatchCategory::Final,
        }
    }
}

impl KnockoutStage {
    pub fn label(self) -> &'static str {
        MatchCategory::from(self).label()
    }
}

/// The single in-progress match held by the store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActiveMatch {
    pub id: MatchId,
    pub group: Group,
    pub team_1_id: TeamId,
    pub team_2_id: TeamId,
    pub category: MatchCategory,
    pub started_at: DateTime<Utc>,
}

impl ActiveMatch {
    pub fn new(group: Group, team_1_id: TeamId, team_2_id: TeamId, category: MatchCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            team_1_id,
            team_2_id,
            category,
            started_at: Utc::now(),
        }
    }
}

/// Match slot of the store: at most one current match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub current_match: Option<ActiveMatch>,
}
