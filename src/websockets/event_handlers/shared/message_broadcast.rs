use crate::{
    event::RoomEventError,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};
use std::sync::Arc;

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    pub async fn broadcast_to_connections(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_ids: &[String],
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        if connection_ids.is_empty() {
            return Ok(());
        }
        let message_json = serialize(message)?;
        connection_manager
            .send_to_connections(connection_ids, &message_json)
            .await;
        Ok(())
    }

    pub async fn send_to_connection(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serialize(message)?;
        connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;
        Ok(())
    }

    /// Reports a rejected request back to the member that made it
    pub async fn send_error(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        error: impl ToString,
    ) -> Result<(), RoomEventError> {
        Self::send_to_connection(
            connection_manager,
            connection_id,
            &WebSocketMessage::error(error.to_string()),
        )
        .await
    }
}

fn serialize(message: &WebSocketMessage) -> Result<String, RoomEventError> {
    message
        .to_json()
        .map_err(|e| RoomEventError::HandlerError(format!("Failed to serialize message: {}", e)))
}
