use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::content::{Question, SectionContent, Segment};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Question table and starting segment data of one section.
pub struct ContentResponse {
    /// Section name as requested.
    pub section: String,
    pub questions: Vec<Question>,
    pub segments: Vec<Segment>,
}

impl ContentResponse {
    /// Copy `content` out under the requested `section` name.
    pub fn new(section: impl Into<String>, content: &SectionContent) -> Self {
        Self {
            section: section.into(),
            questions: content.questions.clone(),
            segments: content.segments.clone(),
        }
    }
}
