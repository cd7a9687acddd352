use std::sync::Arc;

use crate::state::{
    action::Action,
    content::ContentCatalog,
    game::{GameState, Player, new_player_id},
    progression::{advance_patch, start_patch},
};

/// Computes the next [`GameState`] from the current one and an [`Action`].
///
/// This is the only place whole-document transitions are decided. Reducing never
/// fails: actions whose preconditions do not hold leave the state unchanged.
#[derive(Debug, Clone)]
pub struct Reducer {
    content: Arc<ContentCatalog>,
}

impl Reducer {
    /// Create a reducer resolving questions from `content`.
    pub fn new(content: Arc<ContentCatalog>) -> Self {
        Self { content }
    }

    /// Content tables the reducer resolves questions against.
    pub fn content(&self) -> &ContentCatalog {
        &self.content
    }

    /// State produced by `RESET` and by store initialization.
    pub fn initial_state(&self) -> GameState {
        GameState::initial(&self.content)
    }

    /// Apply `action` to `state`.
    pub fn reduce(&self, mut state: GameState, action: Action) -> GameState {
        match action {
            Action::PlayerJoin { name } => {
                let id = new_player_id(&state.players);
                state.players.push(Player::new(id, name));
            }
            Action::UpdateState(patch) => state.merge(patch),
            Action::RevealAnswer => {
                state.reveal_current_answer(&self.content);
            }
            Action::PlayerAnswer { option_idx } => state.record_vote(option_idx),
            Action::Reset => return self.initial_state(),
            Action::StartGame => state.merge(start_patch(&self.content)),
            Action::NextQuestion => {
                let patch = advance_patch(&state, &self.content);
                state.merge(patch);
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::state::{
        content::{METRIC_COLUMNS, Question, QuestionOption, RevealColumn, Section, SectionContent},
        game::{GameStatePatch, GameStatus},
    };
    use indexmap::IndexMap;

    fn reducer() -> Reducer {
        Reducer::new(Arc::new(ContentCatalog::default()))
    }

    fn apply_all(reducer: &Reducer, state: GameState, actions: Vec<Action>) -> GameState {
        actions
            .into_iter()
            .fold(state, |state, action| reducer.reduce(state, action))
    }

    fn jump_to(index: i64) -> Action {
        Action::UpdateState(GameStatePatch {
            status: Some(GameStatus::Playing),
            current_question_index: Some(index),
            ..Default::default()
        })
    }

    #[test]
    fn every_join_adds_a_player_with_unique_id() {
        let reducer = reducer();
        let joins = (0..25)
            .map(|n| Action::PlayerJoin {
                name: format!("player {n}"),
            })
            .collect();

        let state = apply_all(&reducer, reducer.initial_state(), joins);

        assert_eq!(state.players.len(), 25);
        let ids: HashSet<_> = state.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 25);
        assert!(state.players.iter().all(|p| !p.id.is_empty() && p.score == 0));
    }

    #[test]
    fn changing_question_clears_votes() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                jump_to(0),
                Action::PlayerAnswer { option_idx: 0 },
                Action::PlayerAnswer { option_idx: 3 },
                jump_to(1),
            ],
        );
        assert!(state.votes.is_empty());
        assert_eq!(state.current_question_index, 1);
    }

    #[test]
    fn same_question_index_keeps_votes() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                jump_to(0),
                Action::PlayerAnswer { option_idx: 1 },
                jump_to(0),
            ],
        );
        assert_eq!(state.votes.get(&1), Some(&1));
    }

    #[test]
    fn votes_accumulate_per_option() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                jump_to(0),
                Action::PlayerAnswer { option_idx: 2 },
                Action::PlayerAnswer { option_idx: 2 },
                Action::PlayerAnswer { option_idx: 2 },
            ],
        );
        assert_eq!(state.votes.get(&2), Some(&3));
        assert_eq!(state.votes.len(), 1);
    }

    #[test]
    fn vote_tally_stops_at_the_maximum() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                jump_to(0),
                Action::UpdateState(GameStatePatch {
                    votes: Some([(0, u32::MAX)].into()),
                    ..Default::default()
                }),
                Action::PlayerAnswer { option_idx: 0 },
            ],
        );
        assert_eq!(state.votes.get(&0), Some(&u32::MAX));
    }

    #[test]
    fn next_question_from_the_largest_index_moves_to_next_section() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![jump_to(i64::MAX), Action::NextQuestion],
        );
        assert_eq!(state.current_section, Section::Personas);
        assert_eq!(state.current_question_index, 0);
    }

    #[test]
    fn reveal_is_idempotent() {
        let reducer = reducer();
        let once = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![jump_to(0), Action::RevealAnswer],
        );
        let twice = reducer.reduce(once.clone(), Action::RevealAnswer);

        assert!(once.is_answer_revealed);
        assert_eq!(once.revealed_columns, vec!["clients"]);
        assert_eq!(once.revealed_columns, twice.revealed_columns);
    }

    #[test]
    fn reveal_accumulates_columns_across_questions() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                jump_to(0),
                Action::RevealAnswer,
                Action::NextQuestion,
                Action::RevealAnswer,
            ],
        );
        assert_eq!(state.revealed_columns, vec!["clients", "assets"]);
    }

    #[test]
    fn reveal_all_discloses_every_metric_column() {
        let content = ContentCatalog::new(IndexMap::from([(
            Section::Groups,
            SectionContent {
                questions: vec![Question {
                    id: 1,
                    text: "all of it".into(),
                    reveal_column: RevealColumn::All,
                    correct_option_index: 0,
                    options: vec![QuestionOption {
                        text: "A".into(),
                        impact: Vec::new(),
                    }],
                }],
                segments: Vec::new(),
            },
        )]));
        let reducer = Reducer::new(Arc::new(content));

        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                jump_to(0),
                Action::UpdateState(GameStatePatch {
                    revealed_columns: Some(vec!["clients".into()]),
                    ..Default::default()
                }),
                Action::RevealAnswer,
            ],
        );

        let revealed: HashSet<_> = state.revealed_columns.iter().map(String::as_str).collect();
        let expected: HashSet<_> = METRIC_COLUMNS.into_iter().collect();
        assert_eq!(revealed, expected);
        assert_eq!(state.revealed_columns.len(), METRIC_COLUMNS.len());
    }

    #[test]
    fn reveal_without_current_question_is_a_no_op() {
        let reducer = reducer();
        let initial = reducer.initial_state();
        let next = reducer.reduce(initial.clone(), Action::RevealAnswer);
        assert_eq!(next, initial);
    }

    #[test]
    fn reset_restores_initial_state_from_anywhere() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                Action::PlayerJoin { name: "Ana".into() },
                Action::StartGame,
                Action::PlayerAnswer { option_idx: 0 },
                Action::RevealAnswer,
                Action::NextQuestion,
                Action::UpdateState(GameStatePatch {
                    current_section: Some(Section::Empresas),
                    ..Default::default()
                }),
                Action::Reset,
            ],
        );

        assert_eq!(state, reducer.initial_state());
        assert_eq!(state.status, GameStatus::Lobby);
        assert_eq!(state.current_question_index, -1);
        assert!(state.players.is_empty());
        assert!(state.votes.is_empty());
        assert!(state.revealed_columns.is_empty());
        assert_eq!(
            state.segments,
            reducer.content().initial_segments(Section::Groups)
        );
    }

    #[test]
    fn join_vote_reveal_scenario() {
        let reducer = reducer();
        let state = apply_all(
            &reducer,
            reducer.reduce(reducer.initial_state(), Action::Reset),
            vec![
                Action::PlayerJoin { name: "Ana".into() },
                jump_to(0),
                Action::PlayerAnswer { option_idx: 0 },
                Action::RevealAnswer,
            ],
        );

        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].name, "Ana");
        assert_eq!(state.players[0].score, 0);
        assert!(!state.players[0].id.is_empty());
        assert_eq!(state.votes, [(0, 1)].into());
        assert!(state.is_answer_revealed);

        let first = reducer.content().question(Section::Groups, 0).unwrap();
        for column in first.reveal_column.columns() {
            assert!(state.revealed_columns.iter().any(|c| c == column));
        }
    }

    #[test]
    fn next_question_past_last_section_shows_results() {
        let reducer = reducer();
        let last_index = reducer.content().question_count(Section::Empresas) as i64 - 1;
        let state = apply_all(
            &reducer,
            reducer.initial_state(),
            vec![
                Action::StartGame,
                Action::UpdateState(GameStatePatch {
                    current_section: Some(Section::Empresas),
                    current_question_index: Some(last_index),
                    ..Default::default()
                }),
                Action::NextQuestion,
            ],
        );
        assert_eq!(state.status, GameStatus::Results);
    }
}
