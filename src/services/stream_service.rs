use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::{
    dao::game_store::ChangeEvent,
    dto::sse::ServerEvent,
    error::ServiceError,
    state::{SharedState, game::GameState},
};

/// SSE event name carrying the full game document.
pub const STATE_EVENT: &str = "state";
/// SSE event name carrying one `{path, value}` node change.
pub const CHILD_EVENT: &str = "child";

/// Subscribe to the store's change feed, failing for pull-only backends.
pub fn subscribe(state: &SharedState) -> Result<broadcast::Receiver<ChangeEvent>, ServiceError> {
    let store = state.store();
    store
        .subscribe()
        .ok_or(ServiceError::StreamUnsupported(store.backend()))
}

/// Convert a change feed into an SSE response.
///
/// The client first receives the whole document, then every child change
/// followed by the document it produced. When the subscriber lags behind, the
/// skipped changes are dropped and a fresh document is sent instead.
pub fn to_sse_stream(
    state: SharedState,
    mut receiver: broadcast::Receiver<ChangeEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        if !send_state(&state, &tx).await {
            return;
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(change) => {
                            let Some(event) = encode(CHILD_EVENT, &change) else {
                                continue;
                            };
                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                            if !send_state(&state, &tx).await {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "SSE subscriber lagged; resending document");
                            if !send_state(&state, &tx).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        info!("state SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Push the current document; returns `false` once the client is gone.
async fn send_state(state: &SharedState, tx: &mpsc::Sender<Result<Event, Infallible>>) -> bool {
    let snapshot: GameState = match state.store().snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "failed to read game document for SSE");
            return !tx.is_closed();
        }
    };

    match encode(STATE_EVENT, &snapshot) {
        Some(event) => tx.send(Ok(event)).await.is_ok(),
        None => !tx.is_closed(),
    }
}

fn encode<T: serde::Serialize>(name: &'static str, payload: &T) -> Option<Event> {
    match ServerEvent::json(name, payload) {
        Ok(event) => Some(event.into()),
        Err(err) => {
            warn!(error = %err, event = name, "failed to encode SSE payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{AppConfig, StoreBackend},
        state::AppState,
    };

    #[tokio::test]
    async fn polling_backend_has_no_stream() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        assert!(matches!(
            subscribe(&state),
            Err(ServiceError::StreamUnsupported(StoreBackend::Polling))
        ));
    }

    #[tokio::test]
    async fn realtime_backend_streams() {
        let state =
            AppState::from_config(AppConfig::default().with_backend(StoreBackend::Realtime))
                .unwrap();
        assert!(subscribe(&state).is_ok());
    }
}
