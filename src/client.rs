//! Headless client for the polling backend: fetches the game document on an
//! interval and publishes it through a [`watch`] channel.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle, time};
use tracing::{debug, warn};

use crate::{config::AppConfig, dto::action::ActionResponse, state::game::GameState};

/// Errors raised while talking to the game server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to `{url}` failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered `{url}` with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// HTTP client bound to one game server.
#[derive(Debug, Clone)]
pub struct StateClient {
    http: Client,
    base_url: String,
}

impl StateClient {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing [`Client`].
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Fetch the full game document.
    pub async fn fetch_state(&self) -> Result<GameState, ClientError> {
        let url = self.url("/api/state");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        decode(url, response).await
    }

    /// Post an action body such as `{"type": "PLAYER_JOIN", "name": "Ana"}` and
    /// return the document the server answered with.
    pub async fn send_action<A: Serialize + ?Sized>(
        &self,
        action: &A,
    ) -> Result<GameState, ClientError> {
        let url = self.url("/api/action");
        let response = self
            .http
            .post(&url)
            .json(action)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let body: ActionResponse = decode(url, response).await?;
        Ok(body.state)
    }

    /// Poll the server every `interval`, publishing each fetched document to `sink`.
    ///
    /// Failed fetches are logged and the last published document stays in place.
    /// The task ends once every receiver of `sink` is gone.
    pub fn poll(
        self,
        interval: Duration,
        sink: watch::Sender<Option<GameState>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = sink.closed() => break,
                    _ = ticker.tick() => {}
                }

                match self.fetch_state().await {
                    Ok(state) => {
                        sink.send_if_modified(|current| {
                            if current.as_ref() == Some(&state) {
                                return false;
                            }
                            *current = Some(state);
                            true
                        });
                    }
                    Err(err) => warn!(error = %err, "polling game state failed; keeping last state"),
                }
            }

            debug!(base_url = %self.base_url, "state poller stopped");
        })
    }

    /// [`StateClient::poll`] at the interval configured by `pollIntervalMs`.
    pub fn poll_configured(
        self,
        config: &AppConfig,
        sink: watch::Sender<Option<GameState>>,
    ) -> JoinHandle<()> {
        self.poll(config.poll_interval(), sink)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(url: &str, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    url: String,
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { url, status });
    }
    response
        .json::<T>()
        .await
        .map_err(|source| ClientError::Transport { url, source })
}
