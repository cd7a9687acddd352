//! Reading the shared game document and applying actions to it.

use tracing::{debug, info, warn};

use crate::{
    dto::action::ActionMessage,
    error::ServiceError,
    state::{SharedState, action::Action, game::GameState},
};

/// Return the current game document.
pub async fn current_state(state: &SharedState) -> Result<GameState, ServiceError> {
    Ok(state.store().snapshot().await?)
}

/// Decode `body` as an action and apply it, returning the resulting document.
///
/// Bodies that do not decode into a valid action, and state patches while they
/// are disabled, leave the document untouched and return it as is.
pub async fn dispatch(state: &SharedState, body: &[u8]) -> Result<GameState, ServiceError> {
    let action = match ActionMessage::decode(body).and_then(ActionMessage::into_action) {
        Ok(action) => action,
        Err(err) => {
            warn!(error = %err, "ignoring action");
            return current_state(state).await;
        }
    };

    apply(state, action).await
}

/// Apply an already validated action, honoring the state patch policy.
pub async fn apply(state: &SharedState, action: Action) -> Result<GameState, ServiceError> {
    if matches!(action, Action::UpdateState(_)) && !state.config().allow_state_patches() {
        warn!("state patches are disabled; ignoring UPDATE_STATE");
        return current_state(state).await;
    }

    let kind = action.kind();
    debug!(action = ?action, "applying action");
    let next = state.store().apply(action).await?;
    info!(
        action = kind,
        status = ?next.status,
        section = %next.current_section,
        question = next.current_question_index,
        players = next.players.len(),
        "action applied"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        config::{AppConfig, StoreBackend},
        state::{AppState, game::GameStatus},
    };

    fn app(config: AppConfig) -> SharedState {
        AppState::from_config(config).unwrap()
    }

    async fn send(state: &SharedState, body: serde_json::Value) -> GameState {
        dispatch(state, body.to_string().as_bytes()).await.unwrap()
    }

    #[tokio::test]
    async fn malformed_bodies_return_the_unchanged_document() {
        let state = app(AppConfig::default());
        let before = current_state(&state).await.unwrap();

        assert_eq!(dispatch(&state, b"{oops").await.unwrap(), before);
        assert_eq!(send(&state, json!({"type": "DANCE"})).await, before);
        assert_eq!(send(&state, json!({"type": "PLAYER_JOIN"})).await, before);
        assert_eq!(
            send(&state, json!({"type": "PLAYER_ANSWER", "optionIdx": -3})).await,
            before
        );
    }

    #[tokio::test]
    async fn patches_are_ignored_when_disabled() {
        let state = app(AppConfig::default().with_state_patches(false));

        let after = send(
            &state,
            json!({"type": "UPDATE_STATE", "state": {"status": "results"}}),
        )
        .await;
        assert_eq!(after.status, GameStatus::Lobby);

        let started = send(&state, json!({"type": "START_GAME"})).await;
        assert_eq!(started.status, GameStatus::Playing);
        assert_eq!(started.current_question_index, 0);
    }

    #[tokio::test]
    async fn both_backends_agree_on_the_join_vote_reveal_flow() {
        for backend in [StoreBackend::Polling, StoreBackend::Realtime] {
            let state = app(AppConfig::default().with_backend(backend));
            assert_eq!(state.store().backend(), backend);

            send(&state, json!({"type": "RESET"})).await;
            send(&state, json!({"type": "PLAYER_JOIN", "name": "Ana"})).await;
            send(
                &state,
                json!({"type": "UPDATE_STATE", "state": {"status": "playing", "currentQuestionIndex": 0}}),
            )
            .await;
            send(
                &state,
                json!({"type": "PLAYER_ANSWER", "payload": {"optionIdx": 0, "questionId": 1}}),
            )
            .await;
            let after = send(&state, json!({"type": "REVEAL_ANSWER"})).await;

            assert_eq!(after.players.len(), 1, "{backend}");
            assert_eq!(after.players[0].name, "Ana");
            assert_eq!(after.players[0].score, 0);
            assert_eq!(after.votes, [(0, 1)].into());
            assert!(after.is_answer_revealed);
            let question = after.current_question(state.content()).unwrap();
            for column in question.reveal_column.columns() {
                assert!(after.revealed_columns.iter().any(|c| c == column));
            }
        }
    }

    #[tokio::test]
    async fn apply_reports_the_new_document() {
        let state = app(AppConfig::default());
        let next = apply(&state, Action::PlayerJoin { name: "Luis".into() })
            .await
            .unwrap();
        assert_eq!(current_state(&state).await.unwrap(), next);
    }
}
