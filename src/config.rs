//! Application-level configuration loading, including the question content catalog.

use std::{
    env, fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::state::content::ContentCatalog;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TRIVIA_LIVE_CONFIG_PATH";
/// Environment variable that overrides the configured store backend.
const BACKEND_ENV: &str = "TRIVIA_STORE_BACKEND";
/// Interval used by the headless client between two state fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Storage strategy holding the shared game document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process document; clients pull it through `GET /api/state`.
    #[default]
    Polling,
    /// Document tree with child writes pushed to subscribers.
    Realtime,
}

impl StoreBackend {
    /// Wire name of the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Polling => "polling",
            StoreBackend::Realtime => "realtime",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a backend name is neither `polling` nor `realtime`.
#[derive(Debug, Error)]
#[error("unknown store backend `{0}`")]
pub struct UnknownBackend(pub String);

impl FromStr for StoreBackend {
    type Err = UnknownBackend;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "polling" => Ok(StoreBackend::Polling),
            "realtime" => Ok(StoreBackend::Realtime),
            _ => Err(UnknownBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    backend: StoreBackend,
    allow_state_patches: bool,
    content_path: Option<PathBuf>,
    poll_interval: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    ///
    /// `TRIVIA_STORE_BACKEND` wins over the file's `backend` field.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        backend = %app_config.backend,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_backend_override(env::var(BACKEND_ENV).ok().as_deref())
    }

    /// Selected store backend.
    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    /// Whether `UPDATE_STATE` patches from clients are applied.
    pub fn allow_state_patches(&self) -> bool {
        self.allow_state_patches
    }

    /// Interval between two fetches of the headless client.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Replace the store backend.
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Enable or disable client-submitted state patches.
    pub fn with_state_patches(mut self, allow: bool) -> Self {
        self.allow_state_patches = allow;
        self
    }

    /// Use `interval` between two fetches of the headless client.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[cfg(test)]
    fn with_content_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.content_path = Some(path.into());
        self
    }

    /// Load the question content, using the built-in catalog when no file is
    /// configured or the configured one is unusable.
    pub fn load_content(&self) -> ContentCatalog {
        let Some(path) = &self.content_path else {
            return ContentCatalog::default();
        };

        match read_catalog(path) {
            Ok(catalog) => {
                info!(path = %path.display(), "loaded question content");
                catalog
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load question content; using built-in defaults"
                );
                ContentCatalog::default()
            }
        }
    }

    fn with_backend_override(self, value: Option<&str>) -> Self {
        let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
            return self;
        };

        match value.parse::<StoreBackend>() {
            Ok(backend) => {
                info!(%backend, "store backend overridden from environment");
                self.with_backend(backend)
            }
            Err(err) => {
                warn!(error = %err, "ignoring {BACKEND_ENV}");
                self
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            allow_state_patches: true,
            content_path: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Error)]
enum ContentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] validator::ValidationErrors),
}

fn read_catalog(path: &Path) -> Result<ContentCatalog, ContentError> {
    let contents = fs::read_to_string(path)?;
    let catalog: ContentCatalog = serde_json::from_str(&contents)?;
    catalog.validate()?;
    Ok(catalog)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    backend: Option<StoreBackend>,
    allow_state_patches: Option<bool>,
    content_path: Option<PathBuf>,
    poll_interval_ms: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            backend: value.backend.unwrap_or(defaults.backend),
            allow_state_patches: value
                .allow_state_patches
                .unwrap_or(defaults.allow_state_patches),
            content_path: value.content_path,
            poll_interval: value
                .poll_interval_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
