use crate::{dto::content::ContentResponse, state::SharedState};

/// Questions and initial segments for `section`; unknown names yield empty lists.
pub fn section_content(state: &SharedState, section: &str) -> ContentResponse {
    ContentResponse::new(section, state.content().resolve(section))
}
