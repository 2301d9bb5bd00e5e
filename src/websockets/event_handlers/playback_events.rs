use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    event::RoomEventError,
    jam::{JamError, JamService, PlaybackChange, PlaybackCommand},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

pub struct PlaybackEventHandlers {
    jam_service: Arc<JamService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl PlaybackEventHandlers {
    pub fn new(jam_service: Arc<JamService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            jam_service,
            connection_manager,
        }
    }

    /// Applies a playback command and relays the result to every other member
    pub async fn handle_playback_request(
        &self,
        room_id: &str,
        connection_id: &str,
        command: PlaybackCommand,
    ) -> Result<(), RoomEventError> {
        debug!(room_id = %room_id, connection_id = %connection_id, command = ?command, "Handling playback request");

        let update = match self.jam_service.apply(room_id, connection_id, command).await {
            Ok(update) => update,
            Err(e) => {
                warn!(room_id = %room_id, connection_id = %connection_id, error = %e, "Playback request rejected");
                return MessageBroadcaster::send_error(&self.connection_manager, connection_id, e)
                    .await;
            }
        };

        let message = match update.change {
            PlaybackChange::TrackChanged { track, position } => {
                WebSocketMessage::play_client(update.room_id, track, position, update.by.name)
            }
            PlaybackChange::Control {
                action,
                position,
                is_playing,
            } => WebSocketMessage::control_client(
                update.room_id,
                action,
                position,
                is_playing,
                update.by.name,
            ),
        };

        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &update.recipients,
            &message,
        )
        .await
    }

    /// Sends the requester the playback state of the room it is in now
    pub async fn handle_sync_request(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_id = %room_id, connection_id = %connection_id, "Handling sync request");

        let snapshot = match self.jam_service.room_of(connection_id).await {
            Some(current) => self.jam_service.snapshot(&current).await,
            None => None,
        };

        match snapshot {
            Some(snapshot) => {
                MessageBroadcaster::send_to_connection(
                    &self.connection_manager,
                    connection_id,
                    &WebSocketMessage::sync(&snapshot),
                )
                .await
            }
            None => {
                MessageBroadcaster::send_error(
                    &self.connection_manager,
                    connection_id,
                    JamError::NotInRoom,
                )
                .await
            }
        }
    }
}
