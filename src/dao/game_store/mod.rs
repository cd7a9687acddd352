pub mod polling;
pub mod realtime;

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::{
    config::StoreBackend,
    dao::storage::StorageResult,
    state::{action::Action, game::GameState, reducer::Reducer},
};

pub use self::{polling::PollingGameStore, realtime::RealtimeGameStore};

/// Change notification for a single node of a document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Slash-separated path of the node that changed.
    pub path: String,
    /// New value, `None` when the node was removed.
    pub value: Option<serde_json::Value>,
}

/// Owner of the shared game document.
///
/// Implementations differ in their consistency class: the polling store applies
/// whole actions under one lock, the realtime store issues child-path writes.
pub trait GameStore: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> StoreBackend;
    /// Read the full current document.
    fn snapshot(&self) -> BoxFuture<'_, StorageResult<GameState>>;
    /// Apply one action and return the resulting document.
    fn apply(&self, action: Action) -> BoxFuture<'_, StorageResult<GameState>>;
    /// Push feed of node changes; `None` for pull-only backends.
    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeEvent>>;
}

/// Build the store selected by configuration.
pub fn build(backend: StoreBackend, reducer: Reducer) -> StorageResult<Arc<dyn GameStore>> {
    let store: Arc<dyn GameStore> = match backend {
        StoreBackend::Polling => Arc::new(PollingGameStore::new(reducer)),
        StoreBackend::Realtime => RealtimeGameStore::start(reducer)?,
    };
    Ok(store)
}
