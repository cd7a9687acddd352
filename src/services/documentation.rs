use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the trivia backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::api::get_state,
        crate::routes::api::post_action,
        crate::routes::api::stream,
        crate::routes::content::get_section,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::action::ActionMessage,
            crate::dto::action::ActionResponse,
            crate::dto::content::ContentResponse,
            crate::config::StoreBackend,
            crate::state::game::GameState,
            crate::state::game::GameStatePatch,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Shared game document and actions"),
        (name = "content", description = "Question content per section"),
    )
)]
pub struct ApiDoc;
