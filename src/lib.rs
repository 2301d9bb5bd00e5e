// Library crate for the Pixel Music server
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod db;
pub mod event;
pub mod jam;
pub mod playlist;
pub mod routes;
pub mod shared;
pub mod stream;
pub mod web;
pub mod websockets;
pub mod youtube;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use event::{EventBus, RoomEvent, RoomSubscription};
pub use jam::JamService;
pub use routes::build_router;
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, JamRoomSubscriber, MessageHandler, MessageType, WebSocketMessage,
    WebsocketReceiveHandler,
};
