use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::content::{ContentCatalog, Question, Section, Segment};

/// Length of generated player identifiers.
const PLAYER_ID_LENGTH: usize = 9;
const PLAYER_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Vote tallies keyed by 0-based option index, scoped to the current question.
pub type Votes = BTreeMap<u32, u32>;

/// Coarse phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Players are joining.
    #[default]
    Lobby,
    /// Questions are being played.
    Playing,
    /// Every section has been played.
    Results,
}

/// Participant registered through the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Player {
    /// Random lowercase base36 token.
    pub id: String,
    pub name: String,
    /// Present for clients; no action changes it.
    pub score: i32,
}

impl Player {
    /// Create a player with a score of zero.
    pub fn new(id: String, name: String) -> Self {
        Self { id, name, score: 0 }
    }
}

/// The single shared document every client reads and mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub status: GameStatus,
    pub current_section: Section,
    /// `-1` when no question is active.
    pub current_question_index: i64,
    pub segments: Vec<Segment>,
    pub revealed_columns: Vec<String>,
    pub players: Vec<Player>,
    pub is_answer_revealed: bool,
    #[schema(value_type = Object)]
    pub votes: Votes,
}

impl GameState {
    /// Fresh lobby state showing the first section's segments.
    pub fn initial(content: &ContentCatalog) -> Self {
        let section = content.first_section();
        Self {
            status: GameStatus::Lobby,
            current_section: section,
            current_question_index: -1,
            segments: content.initial_segments(section),
            revealed_columns: Vec::new(),
            players: Vec::new(),
            is_answer_revealed: false,
            votes: Votes::new(),
        }
    }

    /// Question currently on screen, resolved from section and index.
    pub fn current_question<'a>(&self, content: &'a ContentCatalog) -> Option<&'a Question> {
        content.question(self.current_section, self.current_question_index)
    }

    /// Add `column` to the revealed set unless it is already there.
    pub fn reveal_column(&mut self, column: &str) {
        if !self.revealed_columns.iter().any(|existing| existing == column) {
            self.revealed_columns.push(column.to_string());
        }
    }

    /// Mark the current answer as revealed and disclose its columns.
    ///
    /// Returns `false` without touching the state when no question resolves.
    pub fn reveal_current_answer(&mut self, content: &ContentCatalog) -> bool {
        let Some(question) = self.current_question(content) else {
            return false;
        };

        self.is_answer_revealed = true;
        for column in question.reveal_column.columns() {
            self.reveal_column(column);
        }
        true
    }

    /// Count one vote for `option_idx`. Tallies stop at `u32::MAX`.
    pub fn record_vote(&mut self, option_idx: u32) {
        let count = self.votes.entry(option_idx).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Shallow-merge `patch`; clears votes when it moves to another question.
    pub fn merge(&mut self, patch: GameStatePatch) {
        let clears_votes = patch.changes_question(self);
        let GameStatePatch {
            status,
            current_section,
            current_question_index,
            segments,
            revealed_columns,
            players,
            is_answer_revealed,
            votes,
        } = patch;

        if let Some(status) = status {
            self.status = status;
        }
        if let Some(section) = current_section {
            self.current_section = section;
        }
        if let Some(index) = current_question_index {
            self.current_question_index = index;
        }
        if let Some(segments) = segments {
            self.segments = segments;
        }
        if let Some(columns) = revealed_columns {
            self.revealed_columns.clear();
            for column in &columns {
                self.reveal_column(column);
            }
        }
        if let Some(players) = players {
            self.players = players;
        }
        if let Some(revealed) = is_answer_revealed {
            self.is_answer_revealed = revealed;
        }
        if let Some(votes) = votes {
            self.votes = votes;
        }

        if clears_votes {
            self.votes.clear();
        }
    }
}

/// Partial [`GameState`] submitted through `UPDATE_STATE`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<Player>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_answer_revealed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub votes: Option<Votes>,
}

impl GameStatePatch {
    /// Whether merging this patch moves `state` to another question, either by
    /// index or by switching to another section.
    pub fn changes_question(&self, state: &GameState) -> bool {
        let index_changes = self
            .current_question_index
            .is_some_and(|index| index != state.current_question_index);
        let section_changes = self
            .current_section
            .is_some_and(|section| section != state.current_section);
        index_changes || section_changes
    }
}

/// Generate a player identifier not used by any of `existing`.
pub fn new_player_id(existing: &[Player]) -> String {
    let mut rng = rand::rng();
    loop {
        let candidate: String = (0..PLAYER_ID_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..PLAYER_ID_ALPHABET.len());
                PLAYER_ID_ALPHABET[idx] as char
            })
            .collect();

        if existing.iter().all(|player| player.id != candidate) {
            return candidate;
        }
    }
}
