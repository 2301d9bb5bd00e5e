use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::jam::{ControlAction, ControlPolicy, JamSnapshot, MemberView, Track};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    #[serde(alias = "join-jam")]
    Join,
    #[serde(alias = "jam-play", alias = "sync-play")]
    Play,
    #[serde(alias = "jam-pause")]
    Pause,
    #[serde(alias = "jam-seek")]
    Seek,
    SyncControl,
    RequestSync,
    TransferAdmin,
    EndJam,
    LeaveRoom,

    // Server -> Client
    Connected,
    Sync,
    PlayClient,
    ControlClient,
    RoomUsers,
    Notification,
    JamEnded,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPayload {
    #[serde(alias = "room_id", alias = "roomId")]
    pub room: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub admin_only: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayPayload {
    #[serde(default, alias = "videoId")]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "time")]
    pub position: Option<f64>,
}

impl PlayPayload {
    pub fn track(&self) -> Option<Track> {
        self.video_id.as_ref().map(|video_id| Track {
            video_id: video_id.clone(),
            title: self.title.clone(),
            thumbnail: self.thumbnail.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionPayload {
    #[serde(default, alias = "time")]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncControlPayload {
    pub action: ControlAction,
    #[serde(default, alias = "time")]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferAdminPayload {
    #[serde(alias = "target")]
    pub connection_id: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedPayload {
    pub connection_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    pub room: String,
    pub track: Option<Track>,
    pub position: f64,
    pub is_playing: bool,
    pub admin: String,
    pub policy: ControlPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayClientPayload {
    pub room: String,
    pub track: Track,
    pub position: f64,
    pub by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlClientPayload {
    pub room: String,
    pub action: ControlAction,
    pub position: f64,
    pub is_playing: bool,
    pub by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUsersPayload {
    pub room: String,
    pub users: Vec<MemberView>,
    pub admin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub room: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JamEndedPayload {
    pub room: String,
    pub ended_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                connection_id: None,
            }),
        }
    }

    fn with_payload<T: Serialize>(message_type: MessageType, payload: T) -> Self {
        Self::new(
            message_type,
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Decodes the payload, treating a missing payload as an empty object
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.payload {
            serde_json::Value::Null => serde_json::from_value(serde_json::json!({})),
            value => T::deserialize(value),
        }
    }

    /// Create a connected message, sent once on upgrade
    pub fn connected(connection_id: String, name: String) -> Self {
        let mut message = Self::with_payload(
            MessageType::Connected,
            ConnectedPayload {
                connection_id: connection_id.clone(),
                name,
            },
        );
        if let Some(meta) = message.meta.as_mut() {
            meta.connection_id = Some(connection_id);
        }
        message
    }

    /// Create a sync message carrying the room's current playback state
    pub fn sync(snapshot: &JamSnapshot) -> Self {
        Self::with_payload(
            MessageType::Sync,
            SyncPayload {
                room: snapshot.id.clone(),
                track: snapshot.track.clone(),
                position: snapshot.position,
                is_playing: snapshot.is_playing,
                admin: snapshot.admin.clone(),
                policy: snapshot.policy,
            },
        )
    }

    pub fn play_client(room: String, track: Track, position: f64, by: String) -> Self {
        Self::with_payload(
            MessageType::PlayClient,
            PlayClientPayload {
                room,
                track,
                position,
                by,
            },
        )
    }

    pub fn control_client(
        room: String,
        action: ControlAction,
        position: f64,
        is_playing: bool,
        by: String,
    ) -> Self {
        Self::with_payload(
            MessageType::ControlClient,
            ControlClientPayload {
                room,
                action,
                position,
                is_playing,
                by,
            },
        )
    }

    pub fn room_users(snapshot: &JamSnapshot) -> Self {
        Self::with_payload(
            MessageType::RoomUsers,
            RoomUsersPayload {
                room: snapshot.id.clone(),
                users: snapshot.members.clone(),
                admin: snapshot.admin.clone(),
            },
        )
    }

    pub fn notification(room: String, message: String) -> Self {
        Self::with_payload(
            MessageType::Notification,
            NotificationPayload { room, message },
        )
    }

    pub fn jam_ended(room: String, ended_by: String) -> Self {
        Self::with_payload(MessageType::JamEnded, JamEndedPayload { room, ended_by })
    }

    /// Create an error message, sent to the offending connection only
    pub fn error(message: String) -> Self {
        Self::with_payload(MessageType::Error, ErrorPayload { message })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
