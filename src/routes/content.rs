use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{dto::content::ContentResponse, services::content_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/api/content/{section}",
    tag = "content",
    params(("section" = String, Path, description = "Section name: groups, personas or empresas")),
    responses((status = 200, description = "Questions and initial segments; empty for unknown sections", body = ContentResponse))
)]
/// Return the question table and initial segments of a section.
pub async fn get_section(
    State(state): State<SharedState>,
    Path(section): Path<String>,
) -> Json<ContentResponse> {
    Json(content_service::section_content(&state, &section))
}

/// Configure the content routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/api/content/{section}", get(get_section))
}
