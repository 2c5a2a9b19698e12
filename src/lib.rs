//! Cricket scoring admin: library with models and match setup logic.

pub mod logic;
pub mod models;

pub use logic::{
    default_roster, load_roster, read_roster, ActiveMatchSummary, MatchPreview, MatchSetupForm,
    MatchType, RosterError, SetupError, SetupMode, SetupScreen, SetupView, TeamOption, TeamSlot,
    Toast, ToastKind, DEFAULT_ROSTER_CSV, KNOCKOUT_PLACEHOLDER_GROUP,
};
pub use models::{
    ActiveMatch, CricketStore, Group, KnockoutStage, MatchCategory, MatchId, MatchState,
    StoreError, Team, TeamId, Tournament,
};
