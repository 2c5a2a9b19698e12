//! Team roster loading from CSV (`id,name,primary_color,group`).

use crate::models::{Group, Team, TeamId};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Roster shipped with the binary, used when no `ROSTER_CSV` is configured.
pub const DEFAULT_ROSTER_CSV: &str = include_str!("../../data/teams.csv");

/// Errors that can occur while loading a roster.
#[derive(Debug)]
pub enum RosterError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// Group column was not "A" or "B".
    InvalidGroup { team: TeamId, value: String },
    /// Id or name column was empty (1-based data row).
    BlankField { row: usize },
    DuplicateTeam(TeamId),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Io(e) => write!(f, "Could not read roster: {}", e),
            RosterError::Csv(e) => write!(f, "Malformed roster CSV: {}", e),
            RosterError::InvalidGroup { team, value } => {
                write!(f, "Team {} has invalid group {:?} (expected A or B)", team, value)
            }
            RosterError::BlankField { row } => write!(f, "Roster row {} has a blank id or name", row),
            RosterError::DuplicateTeam(id) => write!(f, "Team id {} appears more than once", id),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        RosterError::Io(e)
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

#[derive(Deserialize)]
struct RosterRow {
    id: String,
    name: String,
    #[serde(default)]
    primary_color: String,
    group: String,
}

/// Parse a roster from any CSV source. Rows keep their file order.
pub fn read_roster<R: Read>(source: R) -> Result<Vec<Team>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for (i, row) in reader.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        if row.id.is_empty() || row.name.is_empty() {
            return Err(RosterError::BlankField { row: i + 1 });
        }
        let group = row.group.parse::<Group>().map_err(|value| RosterError::InvalidGroup {
            team: row.id.clone(),
            value,
        })?;
        if !seen.insert(row.id.clone()) {
            return Err(RosterError::DuplicateTeam(row.id));
        }
        teams.push(Team::new(row.id, row.name, row.primary_color, group));
    }
    Ok(teams)
}

/// Load a roster from a CSV file on disk.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Team>, RosterError> {
    let file = std::fs::File::open(path)?;
    read_roster(file)
}

/// The embedded default roster.
pub fn default_roster() -> Result<Vec<Team>, RosterError> {
    read_roster(DEFAULT_ROSTER_CSV.as_bytes())
}
