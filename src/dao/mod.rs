/// Game document stores.
pub mod game_store;
/// Storage error types shared by the stores.
pub mod storage;
