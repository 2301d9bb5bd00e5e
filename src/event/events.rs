use crate::jam::PlaybackCommand;

/// Events routed to a single Jam room.
///
/// Membership variants are facts that already happened in the registry;
/// `*Requested` variants are member intents the room subscriber applies.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    MemberJoined {
        connection_id: String,
        name: String,
    },
    MemberLeft {
        connection_id: String,
        name: String,
    },
    AdminChanged {
        old_admin: Option<String>,
        new_admin: String,
        new_admin_name: String,
    },
    PlaybackRequested {
        connection_id: String,
        command: PlaybackCommand,
    },
    SyncRequested {
        connection_id: String,
    },
    AdminTransferRequested {
        connection_id: String,
        target: String,
    },
    EndRequested {
        connection_id: String,
    },
}

impl RoomEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::MemberJoined { .. } => "member_joined",
            RoomEvent::MemberLeft { .. } => "member_left",
            RoomEvent::AdminChanged { .. } => "admin_changed",
            RoomEvent::PlaybackRequested { .. } => "playback_requested",
            RoomEvent::SyncRequested { .. } => "sync_requested",
            RoomEvent::AdminTransferRequested { .. } => "admin_transfer_requested",
            RoomEvent::EndRequested { .. } => "end_requested",
        }
    }
}
