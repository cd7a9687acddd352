pub mod action;
pub mod content;
pub mod game;
pub mod progression;
pub mod reducer;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::{
        game_store::{self, GameStore},
        storage::StorageResult,
    },
    state::{content::ContentCatalog, reducer::Reducer},
};

pub type SharedState = Arc<AppState>;

/// Central application state handed to every handler.
pub struct AppState {
    store: Arc<dyn GameStore>,
    content: Arc<ContentCatalog>,
    config: AppConfig,
}

impl AppState {
    /// Build the state from configuration: load content, then start the selected store.
    pub fn from_config(config: AppConfig) -> StorageResult<SharedState> {
        let content = Arc::new(config.load_content());
        let store = game_store::build(config.backend(), Reducer::new(content.clone()))?;
        Ok(Self::new(store, content, config))
    }

    /// Wrap already built parts in a [`SharedState`].
    pub fn new(
        store: Arc<dyn GameStore>,
        content: Arc<ContentCatalog>,
        config: AppConfig,
    ) -> SharedState {
        Arc::new(Self {
            store,
            content,
            config,
        })
    }

    /// Store owning the game document.
    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    /// Question content served to clients and used to resolve reveals.
    pub fn content(&self) -> &ContentCatalog {
        &self.content
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
