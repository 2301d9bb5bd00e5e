// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, WebsocketReceiveHandler};
pub use jam_room_subscriber::JamRoomSubscriber;
pub use messages::{MessageType, WebSocketMessage};
pub use socket::MessageHandler;

// Internal modules
mod connection_manager;
pub mod event_handlers;
mod handler;
mod jam_room_subscriber;
pub mod messages;
mod socket;
