//! Question flow computed on behalf of the host: starting the game and moving
//! through questions and sections.

use crate::state::{
    content::ContentCatalog,
    game::{GameState, GameStatePatch, GameStatus},
};

/// Patch starting the first question of the first section.
pub fn start_patch(content: &ContentCatalog) -> GameStatePatch {
    let section = content.first_section();
    GameStatePatch {
        status: Some(GameStatus::Playing),
        current_section: Some(section),
        current_question_index: Some(0),
        segments: Some(content.initial_segments(section)),
        revealed_columns: Some(Vec::new()),
        is_answer_revealed: Some(false),
        ..Default::default()
    }
}

/// Patch moving past the current question.
///
/// Past the last question of a section the next section starts at its first
/// question with a clean reveal; past the last section the game ends.
pub fn advance_patch(state: &GameState, content: &ContentCatalog) -> GameStatePatch {
    let next_question = state.current_question_index.saturating_add(1);
    let question_count = content.question_count(state.current_section) as i64;

    if next_question < question_count {
        return GameStatePatch {
            current_question_index: Some(next_question),
            is_answer_revealed: Some(false),
            ..Default::default()
        };
    }

    match content.next_section(state.current_section) {
        Some(section) => GameStatePatch {
            current_section: Some(section),
            current_question_index: Some(0),
            segments: Some(content.initial_segments(section)),
            revealed_columns: Some(Vec::new()),
            is_answer_revealed: Some(false),
            ..Default::default()
        },
        None => GameStatePatch {
            status: Some(GameStatus::Results),
            is_answer_revealed: Some(false),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::content::Section;

    #[test]
    fn start_resets_flow_but_keeps_players() {
        let content = ContentCatalog::default();
        let mut state = GameState::initial(&content);
        state.players.push(crate::state::game::Player::new("abc".into(), "Ana".into()));
        state.revealed_columns.push("clients".into());

        state.merge(start_patch(&content));

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.current_question_index, 0);
        assert!(state.revealed_columns.is_empty());
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn advance_within_section_moves_to_next_question() {
        let content = ContentCatalog::default();
        let mut state = GameState::initial(&content);
        state.merge(start_patch(&content));
        state.record_vote(1);
        state.is_answer_revealed = true;
        state.reveal_column("clients");

        state.merge(advance_patch(&state, &content));

        assert_eq!(state.current_question_index, 1);
        assert_eq!(state.current_section, Section::Groups);
        assert!(!state.is_answer_revealed);
        assert!(state.votes.is_empty());
        assert_eq!(state.revealed_columns, vec!["clients"]);
    }

    #[test]
    fn advance_walks_every_section_then_shows_results() {
        let content = ContentCatalog::default();
        let mut state = GameState::initial(&content);
        state.merge(start_patch(&content));

        let mut visited = vec![state.current_section];
        let total: usize = Section::ALL
            .iter()
            .map(|section| content.question_count(*section))
            .sum();

        for _ in 1..total {
            state.reveal_current_answer(&content);
            state.merge(advance_patch(&state, &content));
            if visited.last() != Some(&state.current_section) {
                assert_eq!(state.current_question_index, 0);
                assert!(state.revealed_columns.is_empty());
                assert_eq!(
                    state.segments,
                    content.initial_segments(state.current_section)
                );
                visited.push(state.current_section);
            }
            assert_eq!(state.status, GameStatus::Playing);
        }

        assert_eq!(visited, Section::ALL.to_vec());

        state.merge(advance_patch(&state, &content));
        assert_eq!(state.status, GameStatus::Results);
        assert_eq!(state.current_section, Section::Empresas);
    }
}
