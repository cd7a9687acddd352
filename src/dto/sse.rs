use axum::response::sse::Event;
use serde::Serialize;

#[derive(Clone, Debug)]
/// Named SSE payload, serialised once and framed per subscriber.
pub struct ServerEvent {
    pub name: &'static str,
    pub data: String,
}

impl ServerEvent {
    /// Serialise `payload` as the data field of an event called `name`.
    pub fn json<T: Serialize>(name: &'static str, payload: &T) -> serde_json::Result<Self> {
        Ok(Self {
            name,
            data: serde_json::to_string(payload)?,
        })
    }
}

impl From<ServerEvent> for Event {
    fn from(value: ServerEvent) -> Self {
        Event::default().event(value.name).data(value.data)
    }
}
