use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::{error::panic_response, state::SharedState};

pub mod api;
pub mod content;
pub mod docs;
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
///
/// A panicking handler answers 500 with the usual `{error}` body.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(api::router())
        .merge(content::router())
        .merge(docs::router())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}
