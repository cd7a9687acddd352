use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload naming the active store backend.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.store().backend())
}
