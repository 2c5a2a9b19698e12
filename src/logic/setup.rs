//! Match setup: pick two teams (group stage or knockout), validate, start the match.
//!
//! The form only holds the operator's selections. Teams and the active-match slot belong to a
//! [`CricketStore`]; every derived view (options, preview, screen) is computed from both on demand.

use crate::models::{
    ActiveMatch, CricketStore, Group, KnockoutStage, MatchCategory, StoreError, Team, TeamId,
};
use serde::{Deserialize, Serialize};

/// Knockout matches are not played within a group; the store still wants one.
pub const KNOCKOUT_PLACEHOLDER_GROUP: Group = Group::A;

const ACTIVE_MATCH_MESSAGE: &str =
    "There's already an active match. End the current match before starting a new one.";

/// Which tab of the form is showing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Group,
    Knockout,
}

/// One of the two team selectors on a tab.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TeamSlot {
    #[serde(rename = "team_1")]
    Team1,
    #[serde(rename = "team_2")]
    Team2,
}

/// Where the form is in its lifecycle, as seen from the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetupMode {
    /// No match in progress; the operator is configuring one on the given tab.
    SettingUp(MatchType),
    /// The store has a current match; only resuming the scorer is possible.
    MatchActive,
}

/// Errors from starting a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SetupError {
    /// One or both team selectors are empty.
    MissingTeams,
    /// Both selectors hold the same team.
    SameTeam,
    /// A group-stage pick is not in the selected group.
    TeamNotInGroup { team: TeamId, group: Group },
    /// The store already has a current match.
    MatchInProgress,
    /// The store refused the match.
    Store(StoreError),
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::MissingTeams => write!(f, "Please select both teams"),
            SetupError::SameTeam => write!(f, "Please select different teams"),
            SetupError::TeamNotInGroup { team, group } => {
                write!(f, "Team {} is not in Group {}", team, group)
            }
            SetupError::MatchInProgress => write!(f, "{}", ACTIVE_MATCH_MESSAGE),
            SetupError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl From<StoreError> for SetupError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MatchInProgress => SetupError::MatchInProgress,
            other => SetupError::Store(other),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification for the operator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

impl From<&SetupError> for Toast {
    fn from(e: &SetupError) -> Self {
        Toast::error(e.to_string())
    }
}

/// An entry in a team selector.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamOption {
    pub team: Team,
    /// The team is already picked in the other slot.
    pub disabled: bool,
    /// Extra text after the name (knockout tab shows the team's group).
    pub hint: Option<String>,
}

/// "A vs B" pairing shown before the match is started.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchPreview {
    /// Category label; only set for knockout matches.
    pub label: Option<&'static str>,
    pub team_1: Team,
    pub team_2: Team,
}

/// Read-only summary shown instead of the form while a match is in progress.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ActiveMatchSummary {
    pub active_match: ActiveMatch,
    pub category_label: &'static str,
    pub message: &'static str,
    /// None when the id is no longer on the roster.
    pub team_1: Option<Team>,
    pub team_2: Option<Team>,
    pub resume_label: &'static str,
}

/// Everything needed to render the setup form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SetupView {
    pub form: MatchSetupForm,
    pub match_category: MatchCategory,
    pub team_1_options: Vec<TeamOption>,
    pub team_2_options: Vec<TeamOption>,
    pub preview: Option<MatchPreview>,
    pub can_start: bool,
    pub start_label: String,
}

/// What the operator sees: the form, or the summary of the match in progress.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum SetupScreen {
    MatchInProgress(ActiveMatchSummary),
    NewMatch(SetupView),
}

/// Local selection state of the match setup form. Empty ids mean "not selected".
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSetupForm {
    pub group: Group,
    pub team_1_id: TeamId,
    pub team_2_id: TeamId,
    pub match_type: MatchType,
    pub knockout_stage: KnockoutStage,
    pub knockout_team_1_id: TeamId,
    pub knockout_team_2_id: TeamId,
}

fn check_pair(team_1_id: &str, team_2_id: &str) -> Result<(), SetupError> {
    if team_1_id.is_empty() || team_2_id.is_empty() {
        return Err(SetupError::MissingTeams);
    }
    if team_1_id == team_2_id {
        return Err(SetupError::SameTeam);
    }
    Ok(())
}

/// Both picks must belong to `group`.
fn check_in_group<S: CricketStore>(
    store: &S,
    group: Group,
    team_1_id: &str,
    team_2_id: &str,
) -> Result<(), SetupError> {
    let members = store.teams_by_group(group);
    for id in [team_1_id, team_2_id] {
        if !members.iter().any(|t| t.id == id) {
            return Err(SetupError::TeamNotInGroup {
                team: id.to_string(),
                group,
            });
        }
    }
    Ok(())
}

fn preview_pair<S: CricketStore>(store: &S, team_1_id: &str, team_2_id: &str) -> Option<(Team, Team)> {
    if team_1_id.is_empty() || team_2_id.is_empty() {
        return None;
    }
    Some((store.team(team_1_id)?, store.team(team_2_id)?))
}

impl MatchSetupForm {
    /// Fresh form: group A, group tab, first semi-final, nothing picked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch group. Always clears both group-stage picks.
    pub fn select_group(&mut self, group: Group) {
        self.group = group;
        self.team_1_id.clear();
        self.team_2_id.clear();
    }

    pub fn set_match_type(&mut self, match_type: MatchType) {
        self.match_type = match_type;
    }

    pub fn set_knockout_stage(&mut self, stage: KnockoutStage) {
        self.knockout_stage = stage;
    }

    /// Pick a team for a group-stage slot (empty id clears it).
    pub fn set_group_team(&mut self, slot: TeamSlot, team_id: impl Into<TeamId>) {
        match slot {
            TeamSlot::Team1 => self.team_1_id = team_id.into(),
            TeamSlot::Team2 => self.team_2_id = team_id.into(),
        }
    }

    /// Pick a team for a knockout slot (empty id clears it).
    pub fn set_knockout_team(&mut self, slot: TeamSlot, team_id: impl Into<TeamId>) {
        match slot {
            TeamSlot::Team1 => self.knockout_team_1_id = team_id.into(),
            TeamSlot::Team2 => self.knockout_team_2_id = team_id.into(),
        }
    }

    /// Category the current tab would start.
    pub fn match_category(&self) -> MatchCategory {
        match self.match_type {
            MatchType::Group => MatchCategory::Group,
            MatchType::Knockout => self.knockout_stage.into(),
        }
    }

    /// The two picks of the current tab.
    fn current_pair(&self) -> (&str, &str) {
        match self.match_type {
            MatchType::Group => (self.team_1_id.as_str(), self.team_2_id.as_str()),
            MatchType::Knockout => (
                self.knockout_team_1_id.as_str(),
                self.knockout_team_2_id.as_str(),
            ),
        }
    }

    pub fn can_start_group(&self) -> bool {
        check_pair(&self.team_1_id, &self.team_2_id).is_ok()
    }

    pub fn can_start_knockout(&self) -> bool {
        check_pair(&self.knockout_team_1_id, &self.knockout_team_2_id).is_ok()
    }

    /// Whether the start affordance of the current tab is enabled.
    pub fn can_start(&self) -> bool {
        match self.match_type {
            MatchType::Group => self.can_start_group(),
            MatchType::Knockout => self.can_start_knockout(),
        }
    }

    pub fn start_label(&self) -> String {
        match self.match_type {
            MatchType::Group => "Start Group Match".to_string(),
            MatchType::Knockout => format!("Start {}", self.knockout_stage.label()),
        }
    }

    pub fn mode<S: CricketStore>(&self, store: &S) -> SetupMode {
        if store.current_match().is_some() {
            SetupMode::MatchActive
        } else {
            SetupMode::SettingUp(self.match_type)
        }
    }

    /// Start a group-stage match with the selected group and picks. Both picks must be
    /// teams of the selected group.
    ///
    /// On success the store holds the new match, `navigate` has been called once, and the
    /// returned toast announces the start. On error nothing is changed and `navigate` is not called.
    pub fn start_group_match<S, F>(&self, store: &mut S, navigate: F) -> Result<Toast, SetupError>
    where
        S: CricketStore,
        F: FnOnce(),
    {
        if store.current_match().is_some() {
            return Err(SetupError::MatchInProgress);
        }
        check_pair(&self.team_1_id, &self.team_2_id)?;
        check_in_group(&*store, self.group, &self.team_1_id, &self.team_2_id)?;
        store.start_match(self.group, &self.team_1_id, &self.team_2_id, MatchCategory::Group)?;
        navigate();
        Ok(Toast::success("Group match started!"))
    }

    /// Start a knockout match between any two roster teams. The form's group is ignored.
    pub fn start_knockout_match<S, F>(&self, store: &mut S, navigate: F) -> Result<Toast, SetupError>
    where
        S: CricketStore,
        F: FnOnce(),
    {
        if store.current_match().is_some() {
            return Err(SetupError::MatchInProgress);
        }
        check_pair(&self.knockout_team_1_id, &self.knockout_team_2_id)?;
        let category = MatchCategory::from(self.knockout_stage);
        store.start_match(
            KNOCKOUT_PLACEHOLDER_GROUP,
            &self.knockout_team_1_id,
            &self.knockout_team_2_id,
            category,
        )?;
        navigate();
        Ok(Toast::success(format!("{} started!", category.label())))
    }

    /// Start whatever the current tab describes.
    pub fn start<S, F>(&self, store: &mut S, navigate: F) -> Result<Toast, SetupError>
    where
        S: CricketStore,
        F: FnOnce(),
    {
        match self.match_type {
            MatchType::Group => self.start_group_match(store, navigate),
            MatchType::Knockout => self.start_knockout_match(store, navigate),
        }
    }

    /// Selector entries for one slot of the current tab.
    pub fn team_options<S: CricketStore>(&self, store: &S, slot: TeamSlot) -> Vec<TeamOption> {
        let (team_1_id, team_2_id) = self.current_pair();
        let other = match slot {
            TeamSlot::Team1 => team_2_id,
            TeamSlot::Team2 => team_1_id,
        };
        let (teams, knockout) = match self.match_type {
            MatchType::Group => (store.teams_by_group(self.group), false),
            MatchType::Knockout => (store.teams().to_vec(), true),
        };
        teams
            .into_iter()
            .map(|team| TeamOption {
                disabled: team.id == other,
                hint: knockout.then(|| format!("(Group {})", team.group)),
                team,
            })
            .collect()
    }

    /// Preview of the current tab, when both picks resolve to roster teams
    /// (and, on the group tab, to teams of the selected group).
    pub fn preview<S: CricketStore>(&self, store: &S) -> Option<MatchPreview> {
        let (team_1_id, team_2_id) = self.current_pair();
        let (team_1, team_2) = preview_pair(store, team_1_id, team_2_id)?;
        if self.match_type == MatchType::Group
            && (team_1.group != self.group || team_2.group != self.group)
        {
            return None;
        }
        let label = match self.match_type {
            MatchType::Group => None,
            MatchType::Knockout => Some(self.knockout_stage.label()),
        };
        Some(MatchPreview {
            label,
            team_1,
            team_2,
        })
    }

    /// Project form and store into what the operator should see.
    pub fn screen<S: CricketStore>(&self, store: &S) -> SetupScreen {
        if let Some(active) = store.current_match() {
            let category = active.category;
            return SetupScreen::MatchInProgress(ActiveMatchSummary {
                team_1: store.team(&active.team_1_id),
                team_2: store.team(&active.team_2_id),
                active_match: active.clone(),
                category_label: category.label(),
                message: ACTIVE_MATCH_MESSAGE,
                resume_label: "Go to Scorer",
            });
        }
        SetupScreen::NewMatch(SetupView {
            form: self.clone(),
            match_category: self.match_category(),
            team_1_options: self.team_options(store, TeamSlot::Team1),
            team_2_options: self.team_options(store, TeamSlot::Team2),
            preview: self.preview(store),
            can_start: self.can_start(),
            start_label: self.start_label(),
        })
    }
}
