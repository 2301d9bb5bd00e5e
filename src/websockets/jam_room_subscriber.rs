use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{
    event::{RoomEvent, RoomEventError, RoomEventHandler},
    jam::JamService,
    websockets::connection_manager::ConnectionManager,
};

use super::event_handlers::{MembershipEventHandlers, PlaybackEventHandlers};

/// WebSocket-facing handler for Jam room events
///
/// Delegates to specialized handlers:
/// - MembershipEventHandlers: MemberJoined, MemberLeft, AdminChanged, admin transfer, end
/// - PlaybackEventHandlers: playback and sync requests
pub struct JamRoomSubscriber {
    membership_handlers: MembershipEventHandlers,
    playback_handlers: PlaybackEventHandlers,
}

impl JamRoomSubscriber {
    pub fn new(jam_service: Arc<JamService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            membership_handlers: MembershipEventHandlers::new(
                Arc::clone(&jam_service),
                Arc::clone(&connection_manager),
            ),
            playback_handlers: PlaybackEventHandlers::new(jam_service, connection_manager),
        }
    }
}

#[async_trait]
impl RoomEventHandler for JamRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        debug!(
            room_id = %room_id,
            event_type = event.event_type(),
            "Handling room event for WebSocket connections"
        );

        match event {
            RoomEvent::MemberJoined {
                connection_id,
                name,
            } => {
                self.membership_handlers
                    .handle_member_joined(room_id, &connection_id, &name)
                    .await
            }
            RoomEvent::MemberLeft {
                connection_id,
                name,
            } => {
                self.membership_handlers
                    .handle_member_left(room_id, &connection_id, &name)
                    .await
            }
            RoomEvent::AdminChanged {
                new_admin,
                new_admin_name,
                ..
            } => {
                self.membership_handlers
                    .handle_admin_changed(room_id, &new_admin, &new_admin_name)
                    .await
            }
            RoomEvent::AdminTransferRequested {
                connection_id,
                target,
            } => {
                self.membership_handlers
                    .handle_transfer_request(room_id, &connection_id, &target)
                    .await
            }
            RoomEvent::EndRequested { connection_id } => {
                self.membership_handlers
                    .handle_end_request(room_id, &connection_id)
                    .await
            }
            RoomEvent::PlaybackRequested {
                connection_id,
                command,
            } => {
                self.playback_handlers
                    .handle_playback_request(room_id, &connection_id, command)
                    .await
            }
            RoomEvent::SyncRequested { connection_id } => {
                self.playback_handlers
                    .handle_sync_request(room_id, &connection_id)
                    .await
            }
        }
    }

    fn handler_name(&self) -> &'static str {
        "JamRoomSubscriber"
    }
}
