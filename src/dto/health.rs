use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::StoreBackend;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process serves requests.
    pub status: String,
    /// Store backend holding the game document.
    pub backend: StoreBackend,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(backend: StoreBackend) -> Self {
        Self {
            status: "ok".to_string(),
            backend,
        }
    }
}
