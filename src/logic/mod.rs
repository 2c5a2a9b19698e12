//! Admin business logic: roster loading and match setup.

mod roster;
mod setup;

pub use roster::{default_roster, load_roster, read_roster, RosterError, DEFAULT_ROSTER_CSV};
pub use setup::{
    ActiveMatchSummary, MatchPreview, MatchSetupForm, MatchType, SetupError, SetupMode,
    SetupScreen, SetupView, TeamOption, TeamSlot, Toast, ToastKind, KNOCKOUT_PLACEHOLDER_GROUP,
};
