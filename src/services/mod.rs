/// Question content lookups.
pub mod content_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Reading the game document and applying actions.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Server-Sent Events forwarding of store changes.
pub mod stream_service;
