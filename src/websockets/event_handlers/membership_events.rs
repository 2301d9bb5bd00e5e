use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::RoomEventError,
    jam::{JamService, JamSnapshot},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

/// Handlers for membership facts and admin-only room requests
pub struct MembershipEventHandlers {
    jam_service: Arc<JamService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl MembershipEventHandlers {
    pub fn new(jam_service: Arc<JamService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            jam_service,
            connection_manager,
        }
    }

    pub async fn handle_member_joined(
        &self,
        room_id: &str,
        connection_id: &str,
        name: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_id = %room_id, connection_id = %connection_id, "Handling member joined event");

        let Some(snapshot) = self.current_snapshot(room_id).await else {
            return Ok(());
        };

        self.broadcast_room_users(&snapshot).await?;

        let others: Vec<String> = snapshot
            .member_ids()
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &others,
            &WebSocketMessage::notification(
                room_id.to_string(),
                format!("{} joined the jam", name),
            ),
        )
        .await
    }

    pub async fn handle_member_left(
        &self,
        room_id: &str,
        connection_id: &str,
        name: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_id = %room_id, connection_id = %connection_id, "Handling member left event");

        let Some(snapshot) = self.current_snapshot(room_id).await else {
            return Ok(());
        };

        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &snapshot.member_ids(),
            &WebSocketMessage::notification(room_id.to_string(), format!("{} left the jam", name)),
        )
        .await?;

        self.broadcast_room_users(&snapshot).await
    }

    pub async fn handle_admin_changed(
        &self,
        room_id: &str,
        new_admin: &str,
        new_admin_name: &str,
    ) -> Result<(), RoomEventError> {
        info!(room_id = %room_id, new_admin = %new_admin, "Handling admin changed event");

        let Some(snapshot) = self.current_snapshot(room_id).await else {
            return Ok(());
        };

        self.broadcast_room_users(&snapshot).await?;

        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &snapshot.member_ids(),
            &WebSocketMessage::notification(
                room_id.to_string(),
                format!("{} is now the jam admin", new_admin_name),
            ),
        )
        .await
    }

    pub async fn handle_transfer_request(
        &self,
        room_id: &str,
        connection_id: &str,
        target: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_id = %room_id, connection_id = %connection_id, target = %target, "Handling admin transfer request");

        // The resulting AdminChanged event carries the broadcast
        if let Err(e) = self.jam_service.transfer_admin(room_id, connection_id, target).await {
            MessageBroadcaster::send_error(&self.connection_manager, connection_id, e).await?;
        }
        Ok(())
    }

    pub async fn handle_end_request(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_id = %room_id, connection_id = %connection_id, "Handling end jam request");

        match self.jam_service.end(room_id, connection_id).await {
            Ok(ended) => {
                let member_ids: Vec<String> = ended
                    .members
                    .iter()
                    .map(|m| m.connection_id.clone())
                    .collect();
                MessageBroadcaster::broadcast_to_connections(
                    &self.connection_manager,
                    &member_ids,
                    &WebSocketMessage::jam_ended(ended.room_id.clone(), ended.ended_by.name.clone()),
                )
                .await
            }
            Err(e) => MessageBroadcaster::send_error(&self.connection_manager, connection_id, e).await,
        }
    }

    async fn current_snapshot(&self, room_id: &str) -> Option<JamSnapshot> {
        let snapshot = self.jam_service.snapshot(room_id).await;
        if snapshot.is_none() {
            debug!(room_id = %room_id, "Jam no longer exists, no notifications needed");
        }
        snapshot
    }

    async fn broadcast_room_users(&self, snapshot: &JamSnapshot) -> Result<(), RoomEventError> {
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &snapshot.member_ids(),
            &WebSocketMessage::room_users(snapshot),
        )
        .await
    }
}
