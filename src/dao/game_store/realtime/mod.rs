//! Push-based store: the game document lives in a [`DocumentTree`] under
//! [`ROOT`], actions become child-path writes and subscribers receive every
//! node change.
//!
//! There is no whole-document reducer here. Each action reads the current
//! document, computes its targeted writes from that read and issues them, so two
//! concurrent votes for the same option can both read `n` and both write `n + 1`.

mod document;
mod tree;

use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info};

use crate::{
    config::StoreBackend,
    dao::{
        game_store::{ChangeEvent, GameStore},
        storage::{StorageError, StorageResult},
    },
    state::{
        action::Action,
        game::{GameState, GameStatePatch, Player, new_player_id},
        progression::{advance_patch, start_patch},
        reducer::Reducer,
    },
};

use self::tree::DocumentTree;

/// Top-level key holding the game document.
pub const ROOT: &str = "gameState";
const EVENT_CAPACITY: usize = 64;

/// Game store backed by a document tree with child-path writes.
pub struct RealtimeGameStore {
    tree: Arc<DocumentTree>,
    reducer: Reducer,
    initial: Value,
}

impl RealtimeGameStore {
    /// Create the tree with an initial document and start the listener that
    /// recreates it whenever the document is deleted.
    pub fn start(reducer: Reducer) -> StorageResult<Arc<Self>> {
        let initial = document::encode_state(&reducer.initial_state())
            .map_err(|err| StorageError::corrupted(ROOT, err))?;

        let tree = Arc::new(DocumentTree::with_node(
            EVENT_CAPACITY,
            ROOT,
            initial.clone(),
        ));
        let events = tree.subscribe();
        tokio::spawn(keep_initialized(
            Arc::downgrade(&tree),
            events,
            initial.clone(),
        ));

        Ok(Arc::new(Self {
            tree,
            reducer,
            initial,
        }))
    }

    #[cfg(test)]
    fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Decode the current document, restoring it first when a reset removed it
    /// and the listener has not recreated it yet. Writes below a missing root
    /// would otherwise leave a partial document behind.
    async fn read_state(&self) -> StorageResult<GameState> {
        let node = match self.tree.get(ROOT).await {
            Some(node) => node,
            None => {
                self.tree.set_if_absent(ROOT, self.initial.clone()).await;
                self.initial.clone()
            }
        };
        document::decode_state(node).map_err(|err| StorageError::corrupted(ROOT, err))
    }

    async fn write_patch(&self, cached: &GameState, patch: GameStatePatch) -> StorageResult<()> {
        let clears_votes = patch.changes_question(cached);
        let mut fields =
            document::encode_patch(&patch).map_err(|err| StorageError::corrupted(ROOT, err))?;
        if clears_votes {
            fields.insert("votes".into(), Value::Object(Map::new()));
        }
        self.tree.update(ROOT, fields).await;
        Ok(())
    }

    async fn apply_action(&self, action: Action) -> StorageResult<GameState> {
        let cached = self.read_state().await?;
        let content = self.reducer.content();

        match action {
            Action::PlayerJoin { name } => {
                let player = Player::new(new_player_id(&cached.players), name);
                let path = format!("{ROOT}/players/{}", player.id);
                let node = document::encode_player(&player)
                    .map_err(|err| StorageError::corrupted(path.clone(), err))?;
                self.tree.set(&path, node).await;
            }
            Action::UpdateState(patch) => self.write_patch(&cached, patch).await?,
            Action::StartGame => self.write_patch(&cached, start_patch(content)).await?,
            Action::NextQuestion => {
                let patch = advance_patch(&cached, content);
                self.write_patch(&cached, patch).await?;
            }
            Action::RevealAnswer => {
                let mut next = cached.clone();
                if next.reveal_current_answer(content) {
                    let patch = GameStatePatch {
                        is_answer_revealed: Some(true),
                        revealed_columns: Some(next.revealed_columns),
                        ..Default::default()
                    };
                    self.write_patch(&cached, patch).await?;
                }
            }
            Action::PlayerAnswer { option_idx } => {
                let count = cached.votes.get(&option_idx).copied().unwrap_or(0);
                let next = count.saturating_add(1);
                self.tree
                    .set(&format!("{ROOT}/votes/{option_idx}"), Value::from(next))
                    .await;
            }
            Action::Reset => {
                self.tree.remove(ROOT).await;
            }
        }

        self.read_state().await
    }
}

impl GameStore for RealtimeGameStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Realtime
    }

    fn snapshot(&self) -> BoxFuture<'_, StorageResult<GameState>> {
        Box::pin(self.read_state())
    }

    fn apply(&self, action: Action) -> BoxFuture<'_, StorageResult<GameState>> {
        Box::pin(self.apply_action(action))
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeEvent>> {
        Some(self.tree.subscribe())
    }
}

/// Recreate the game document each time it disappears from the tree.
async fn keep_initialized(
    tree: Weak<DocumentTree>,
    mut events: broadcast::Receiver<ChangeEvent>,
    initial: Value,
) {
    loop {
        match events.recv().await {
            Ok(event) if event.path == ROOT && event.value.is_none() => {}
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "initializer lagged behind tree changes; re-checking");
            }
            Err(RecvError::Closed) => break,
        }

        let Some(tree) = tree.upgrade() else {
            break;
        };
        if tree.set_if_absent(ROOT, initial.clone()).await {
            info!("game document re-initialized");
        }
    }
}
