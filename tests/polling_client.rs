#![cfg(feature = "client")]

use std::time::Duration;

use serde_json::json;
use tokio::{net::TcpListener, sync::watch, time};

use trivia_live_back::{
    client::{ClientError, StateClient},
    config::AppConfig,
    routes,
    state::{AppState, game::GameStatus},
};

/// Serve a fresh polling game on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let state = AppState::from_config(AppConfig::default()).expect("state");
    let app = routes::router(state);

    // Bind to port before spawning - this prevents race conditions
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn client_sends_actions_and_reads_state() {
    let client = StateClient::new(spawn_server().await);

    let joined = client
        .send_action(&json!({"type": "PLAYER_JOIN", "name": "Ana"}))
        .await
        .unwrap();
    assert_eq!(joined.players.len(), 1);

    let fetched = client.fetch_state().await.unwrap();
    assert_eq!(fetched, joined);
}

#[tokio::test]
async fn poller_publishes_changes() {
    let base_url = spawn_server().await;
    let client = StateClient::new(base_url.clone());
    let (tx, mut rx) = watch::channel(None);
    let config = AppConfig::default().with_poll_interval(Duration::from_millis(20));
    let handle = client.clone().poll_configured(&config, tx);

    time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("first poll in time")
        .unwrap();
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|state| state.status),
        Some(GameStatus::Lobby)
    );

    client
        .send_action(&json!({"type": "START_GAME"}))
        .await
        .unwrap();
    time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("change picked up in time")
        .unwrap();
    assert_eq!(
        rx.borrow().as_ref().map(|state| state.status),
        Some(GameStatus::Playing)
    );

    drop(rx);
    time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("poller stops with its receivers")
        .unwrap();
}

#[tokio::test]
async fn error_statuses_surface_as_client_errors() {
    let client = StateClient::new(format!("{}/nowhere", spawn_server().await));
    let err = client.fetch_state().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status, .. } if status.as_u16() == 404));
}
