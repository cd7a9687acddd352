use std::convert::Infallible;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::sse::{Event, Sse},
    routing::{get, post},
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::action::{ActionMessage, ActionResponse},
    error::AppError,
    services::{game_service, stream_service},
    state::{SharedState, game::GameState},
};

#[utoipa::path(
    get,
    path = "/api/state",
    tag = "game",
    responses(
        (status = 200, description = "Current game document", body = GameState),
        (status = 500, description = "Store failure")
    )
)]
/// Return the full shared game document.
pub async fn get_state(State(state): State<SharedState>) -> Result<Json<GameState>, AppError> {
    Ok(Json(game_service::current_state(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/action",
    tag = "game",
    request_body = ActionMessage,
    responses(
        (status = 200, description = "Action processed; unrecognized actions leave the document unchanged", body = ActionResponse),
        (status = 500, description = "Action processing failed")
    )
)]
/// Apply one action to the game document.
///
/// The raw body is decoded here rather than through `Json` so malformed input
/// is answered like any other ignored action.
pub async fn post_action(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ActionResponse>, AppError> {
    let next = game_service::dispatch(&state, &body).await?;
    Ok(Json(ActionResponse::ok(next)))
}

#[utoipa::path(
    get,
    path = "/api/stream",
    tag = "game",
    responses(
        (status = 200, description = "`state` and `child` events", content_type = "text/event-stream", body = String),
        (status = 404, description = "The active backend is pull-only")
    )
)]
/// Stream document changes to push-capable clients.
pub async fn stream(
    State(state): State<SharedState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let receiver = stream_service::subscribe(&state)?;
    info!("New state SSE connection");
    Ok(stream_service::to_sse_stream(state, receiver))
}

/// Configure the game document endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/api/state", get(get_state))
        .route("/api/action", post(post_action))
        .route("/api/stream", get(stream))
}
