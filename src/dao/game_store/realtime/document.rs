//! Mapping between [`GameState`] and its shape inside the document tree.
//!
//! Players are stored as children keyed by id so joins can be written as a single
//! child node. Collections missing from the tree decode as empty.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::{
    content::{Section, Segment},
    game::{GameState, GameStatePatch, GameStatus, Player, Votes},
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameDocument {
    #[serde(default)]
    status: GameStatus,
    #[serde(default)]
    current_section: Section,
    #[serde(default = "no_question")]
    current_question_index: i64,
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    revealed_columns: Vec<String>,
    #[serde(default)]
    players: IndexMap<String, Player>,
    #[serde(default)]
    is_answer_revealed: bool,
    #[serde(default)]
    votes: Votes,
}

fn no_question() -> i64 {
    -1
}

impl From<&GameState> for GameDocument {
    fn from(state: &GameState) -> Self {
        Self {
            status: state.status,
            current_section: state.current_section,
            current_question_index: state.current_question_index,
            segments: state.segments.clone(),
            revealed_columns: state.revealed_columns.clone(),
            players: keyed(&state.players),
            is_answer_revealed: state.is_answer_revealed,
            votes: state.votes.clone(),
        }
    }
}

impl From<GameDocument> for GameState {
    fn from(doc: GameDocument) -> Self {
        Self {
            status: doc.status,
            current_section: doc.current_section,
            current_question_index: doc.current_question_index,
            segments: doc.segments,
            revealed_columns: doc.revealed_columns,
            players: doc.players.into_values().collect(),
            is_answer_revealed: doc.is_answer_revealed,
            votes: doc.votes,
        }
    }
}

fn keyed(players: &[Player]) -> IndexMap<String, Player> {
    players
        .iter()
        .map(|player| (player.id.clone(), player.clone()))
        .collect()
}

/// Encode a full state as the tree node stored under the root key.
pub fn encode_state(state: &GameState) -> serde_json::Result<Value> {
    serde_json::to_value(GameDocument::from(state))
}

/// Decode the root node back into a [`GameState`].
pub fn decode_state(value: Value) -> serde_json::Result<GameState> {
    serde_json::from_value::<GameDocument>(value).map(Into::into)
}

/// Encode a player as its keyed child node.
pub fn encode_player(player: &Player) -> serde_json::Result<Value> {
    serde_json::to_value(player)
}

/// Encode the present fields of `patch` as root children to update.
pub fn encode_patch(patch: &GameStatePatch) -> serde_json::Result<Map<String, Value>> {
    let mut fields = match serde_json::to_value(patch)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    if let Some(players) = &patch.players {
        fields.insert("players".into(), serde_json::to_value(keyed(players))?);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::content::ContentCatalog;

    #[test]
    fn players_are_keyed_by_id_in_the_tree() {
        let mut state = GameState::initial(&ContentCatalog::default());
        state.players.push(Player::new("k1".into(), "Ana".into()));
        state.players.push(Player::new("k2".into(), "Luis".into()));

        let node = encode_state(&state).unwrap();
        assert_eq!(node["players"]["k2"]["name"], "Luis");

        let decoded = decode_state(node).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn missing_collections_decode_as_empty() {
        let decoded = decode_state(json!({"status": "playing", "votes": {"2": 4}})).unwrap();
        assert_eq!(decoded.status, GameStatus::Playing);
        assert_eq!(decoded.current_question_index, -1);
        assert!(decoded.players.is_empty());
        assert_eq!(decoded.votes.get(&2), Some(&4));
    }

    #[test]
    fn patch_encodes_only_present_fields() {
        let patch = GameStatePatch {
            current_question_index: Some(3),
            players: Some(vec![Player::new("k1".into(), "Ana".into())]),
            ..Default::default()
        };
        let fields = encode_patch(&patch).unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["currentQuestionIndex"], 3);
        assert_eq!(fields["players"]["k1"]["score"], 0);
    }
}
