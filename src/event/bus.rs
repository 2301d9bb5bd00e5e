use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::RoomEvent;

/// Event bus for distributing events to Jam rooms
///
/// Each room owns one broadcast channel. Channels are opened when a room is
/// created and closed when it is removed; events for rooms without a channel
/// are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room-specific event channels: room_id -> sender
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<RoomEvent>>>>,
    room_capacity: usize,
}

impl EventBus {
    /// Creates a new event bus with the specified per-room capacity
    pub fn new(room_capacity: usize) -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
            room_capacity: room_capacity.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(100)
    }

    /// Emits an event to all subscribers of a specific room
    pub async fn emit_to_room(&self, room_id: &str, event: RoomEvent) {
        let room_channels = self.room_channels.read().await;

        match room_channels.get(room_id) {
            Some(sender) => match sender.send(event) {
                Ok(receiver_count) => {
                    debug!(
                        room_id = %room_id,
                        receivers = receiver_count,
                        "Room event emitted"
                    );
                }
                Err(_) => {
                    debug!(room_id = %room_id, "Room event emitted with no receivers");
                }
            },
            None => {
                debug!(
                    room_id = %room_id,
                    event_type = event.event_type(),
                    "No channel for room, dropping event"
                );
            }
        }
    }

    /// Opens a fresh channel for a room and returns its first receiver.
    /// Any previous channel for the same id is dropped, which ends its subscribers.
    pub async fn open_room(&self, room_id: &str) -> broadcast::Receiver<RoomEvent> {
        let mut room_channels = self.room_channels.write().await;
        let (sender, receiver) = broadcast::channel(self.room_capacity);
        if room_channels.insert(room_id.to_string(), sender).is_some() {
            debug!(room_id = %room_id, "Replaced stale room channel");
        }
        debug!(room_id = %room_id, "Room channel opened");
        receiver
    }

    /// Drops the room's channel; subscribers finish once buffered events drain
    pub async fn close_room(&self, room_id: &str) {
        let mut room_channels = self.room_channels.write().await;
        if room_channels.remove(room_id).is_some() {
            debug!(room_id = %room_id, "Room channel closed");
        }
    }

    pub async fn has_room(&self, room_id: &str) -> bool {
        self.room_channels.read().await.contains_key(room_id)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_requested(connection_id: &str) -> RoomEvent {
        RoomEvent::SyncRequested {
            connection_id: connection_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_events_reach_room_subscriber_in_order() {
        let bus = EventBus::new(8);
        let mut receiver = bus.open_room("lofi").await;

        bus.emit_to_room("lofi", sync_requested("c1")).await;
        bus.emit_to_room("lofi", sync_requested("c2")).await;

        assert!(matches!(
            receiver.recv().await.unwrap(),
            RoomEvent::SyncRequested { connection_id } if connection_id == "c1"
        ));
        assert!(matches!(
            receiver.recv().await.unwrap(),
            RoomEvent::SyncRequested { connection_id } if connection_id == "c2"
        ));
    }

    #[tokio::test]
    async fn test_emit_to_unknown_room_does_not_create_channel() {
        let bus = EventBus::new(8);

        bus.emit_to_room("ghost", sync_requested("c1")).await;

        assert!(!bus.has_room("ghost").await);
    }

    #[tokio::test]
    async fn test_close_room_ends_subscribers_after_drain() {
        let bus = EventBus::new(8);
        let mut receiver = bus.open_room("lofi").await;

        bus.emit_to_room("lofi", sync_requested("c1")).await;
        bus.close_room("lofi").await;

        assert!(receiver.recv().await.is_ok());
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_reopening_room_replaces_channel() {
        let bus = EventBus::new(8);
        let mut stale = bus.open_room("lofi").await;
        let mut fresh = bus.open_room("lofi").await;

        bus.emit_to_room("lofi", sync_requested("c2")).await;

        assert!(matches!(
            stale.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
        assert!(fresh.recv().await.is_ok());
    }
}
