use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_player_name,
    state::{
        action::Action,
        game::{GameState, GameStatePatch},
    },
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
/// Actions accepted on `POST /api/action`, tagged by their `type` field.
#[serde(tag = "type")]
pub enum ActionMessage {
    #[serde(rename = "PLAYER_JOIN")]
    PlayerJoin(JoinPayload),
    #[serde(rename = "UPDATE_STATE")]
    UpdateState(UpdatePayload),
    #[serde(rename = "REVEAL_ANSWER")]
    RevealAnswer,
    #[serde(rename = "PLAYER_ANSWER")]
    PlayerAnswer(AnswerPayload),
    #[serde(rename = "RESET")]
    Reset,
    #[serde(rename = "START_GAME")]
    StartGame,
    #[serde(rename = "NEXT_QUESTION")]
    NextQuestion,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
/// Payload of `PLAYER_JOIN`.
pub struct JoinPayload {
    #[validate(custom(function = "validate_player_name"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
/// Payload of `UPDATE_STATE`: the fields to overwrite.
///
/// Kept as raw JSON until [`ActionMessage::into_action`] so vote maps keyed by
/// option index survive the tag dispatch.
pub struct UpdatePayload {
    #[schema(value_type = GameStatePatch)]
    pub state: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload of `PLAYER_ANSWER`. The option index may sit at the top level or
/// inside `payload`; the top-level one wins when both are present.
pub struct AnswerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_idx: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<NestedAnswer>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Nested vote body sent by player devices.
pub struct NestedAnswer {
    pub option_idx: i64,
    /// Informational only; votes are always counted for the current question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<u32>,
}

/// Why a message did not turn into an [`Action`].
#[derive(Debug, thiserror::Error)]
pub enum Rejected {
    #[error("body is not a valid action: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown action type")]
    UnknownType,
    #[error("invalid payload: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("option index is missing or negative")]
    BadOption,
}

impl ActionMessage {
    /// Decode a raw request body.
    pub fn decode(body: &[u8]) -> Result<Self, Rejected> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Validate the message and turn it into a domain [`Action`].
    pub fn into_action(self) -> Result<Action, Rejected> {
        match self {
            ActionMessage::PlayerJoin(join) => {
                join.validate()?;
                Ok(Action::PlayerJoin { name: join.name })
            }
            ActionMessage::UpdateState(update) => {
                let patch: GameStatePatch = serde_json::from_value(update.state)?;
                Ok(Action::UpdateState(patch))
            }
            ActionMessage::RevealAnswer => Ok(Action::RevealAnswer),
            ActionMessage::PlayerAnswer(answer) => answer
                .option_idx()
                .map(|option_idx| Action::PlayerAnswer { option_idx })
                .ok_or(Rejected::BadOption),
            ActionMessage::Reset => Ok(Action::Reset),
            ActionMessage::StartGame => Ok(Action::StartGame),
            ActionMessage::NextQuestion => Ok(Action::NextQuestion),
            ActionMessage::Unknown => Err(Rejected::UnknownType),
        }
    }
}

impl AnswerPayload {
    fn option_idx(&self) -> Option<u32> {
        let raw = self
            .option_idx
            .or_else(|| self.payload.as_ref().map(|nested| nested.option_idx))?;
        u32::try_from(raw).ok()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Response of `POST /api/action`.
pub struct ActionResponse {
    pub success: bool,
    pub state: GameState,
}

impl ActionResponse {
    /// Successful response carrying the document after the action.
    pub fn ok(state: GameState) -> Self {
        Self {
            success: true,
            state,
        }
    }
}
