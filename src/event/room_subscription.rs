use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{events::RoomEvent, room_handler::RoomEventHandler};

/// Routes one room's events to a handler, one event at a time
pub struct RoomSubscription {
    room_id: String,
    handler: Arc<dyn RoomEventHandler>,
    receiver: broadcast::Receiver<RoomEvent>,
}

impl RoomSubscription {
    pub fn new(
        room_id: String,
        handler: Arc<dyn RoomEventHandler>,
        receiver: broadcast::Receiver<RoomEvent>,
    ) -> Self {
        Self {
            room_id,
            handler,
            receiver,
        }
    }

    /// Start the subscription - spawns a background task that drains the room
    /// channel into the handler until the channel is closed
    pub fn start(self) -> JoinHandle<()> {
        let Self {
            room_id,
            handler,
            mut receiver,
        } = self;
        let handler_name = handler.handler_name();

        info!(
            room_id = %room_id,
            handler = handler_name,
            "Starting room subscription"
        );

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            room_id = %room_id,
                            handler = handler_name,
                            skipped = skipped,
                            "Room subscription lagged, events skipped"
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                debug!(
                    room_id = %room_id,
                    handler = handler_name,
                    event_type = event.event_type(),
                    "Received room event"
                );

                if let Err(e) = handler.handle_room_event(&room_id, event).await {
                    warn!(
                        room_id = %room_id,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            info!(
                room_id = %room_id,
                handler = handler_name,
                "Room subscription ended - channel closed"
            );
        })
    }
}
