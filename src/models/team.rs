//! Team and Group data structures.

use serde::{Deserialize, Serialize};

/// Unique identifier for a team (roster key, e.g. "mumbai").
pub type TeamId = String;

/// Group-stage pool a team belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Group {
    #[default]
    A,
    B,
}

impl Group {
    pub fn as_str(self) -> &'static str {
        match self {
            Group::A => "A",
            Group::B => "B",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Group::A),
            "B" | "b" => Ok(Group::B),
            other => Err(other.to_string()),
        }
    }
}

/// A team on the tournament roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// HSL triple as used by the admin page, e.g. "210 80% 45%".
    pub primary_color: String,
    pub group: Group,
}

impl Team {
    pub fn new(
        id: impl Into<TeamId>,
        name: impl Into<String>,
        primary_color: impl Into<String>,
        group: Group,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            primary_color: primary_color.into(),
            group,
        }
    }
}
