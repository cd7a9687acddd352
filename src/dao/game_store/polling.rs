//! In-process store behind the HTTP polling API.

use futures::future::BoxFuture;
use tokio::sync::{Mutex, broadcast};

use crate::{
    config::StoreBackend,
    dao::{
        game_store::{ChangeEvent, GameStore},
        storage::StorageResult,
    },
    state::{action::Action, game::GameState, reducer::Reducer},
};

/// Single in-memory document; every action is reduced while holding the lock,
/// so mutations are applied one at a time in arrival order.
pub struct PollingGameStore {
    reducer: Reducer,
    state: Mutex<GameState>,
}

impl PollingGameStore {
    /// Create the store holding the reducer's initial state.
    pub fn new(reducer: Reducer) -> Self {
        let state = Mutex::new(reducer.initial_state());
        Self { reducer, state }
    }
}

impl GameStore for PollingGameStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Polling
    }

    fn snapshot(&self) -> BoxFuture<'_, StorageResult<GameState>> {
        Box::pin(async move { Ok(self.state.lock().await.clone()) })
    }

    fn apply(&self, action: Action) -> BoxFuture<'_, StorageResult<GameState>> {
        Box::pin(async move {
            let mut guard = self.state.lock().await;
            // Reduce a copy; the stored document is only replaced once the next state exists.
            let next = self.reducer.reduce(guard.clone(), action);
            *guard = next.clone();
            Ok(next)
        })
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeEvent>> {
        None
    }
}
