// Event-driven plumbing for Jam rooms
//
// Every room has its own broadcast channel; one subscription task per room
// feeds events to the room handler in order.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoomEvent;
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_subscription::RoomSubscription;

// Internal modules
mod bus;
mod events;
mod room_handler;
mod room_subscription;
