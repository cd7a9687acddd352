use crate::state::game::GameStatePatch;

/// Validated mutation of the shared game state.
///
/// Built from the wire message at the HTTP boundary; every variant carries
/// exactly the fields its transition needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A player joins with a non-blank display name.
    PlayerJoin {
        /// Display name.
        name: String,
    },
    /// Shallow-merge a client-supplied patch.
    UpdateState(GameStatePatch),
    /// Reveal the current question's answer and its metric columns.
    RevealAnswer,
    /// Count one vote for an option of the current question.
    PlayerAnswer {
        /// 0-based option index.
        option_idx: u32,
    },
    /// Wipe the game back to the lobby.
    Reset,
    /// Start the first question of the first section.
    StartGame,
    /// Advance to the next question, section, or the results screen.
    NextQuestion,
}

impl Action {
    /// Wire name of the action, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PlayerJoin { .. } => "PLAYER_JOIN",
            Action::UpdateState(_) => "UPDATE_STATE",
            Action::RevealAnswer => "REVEAL_ANSWER",
            Action::PlayerAnswer { .. } => "PLAYER_ANSWER",
            Action::Reset => "RESET",
            Action::StartGame => "START_GAME",
            Action::NextQuestion => "NEXT_QUESTION",
        }
    }
}
