use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A YouTube video queued into a Jam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(alias = "videoId")]
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Track {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: None,
            thumbnail: None,
        }
    }
}

/// Who may change playback in a room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ControlPolicy {
    #[default]
    Everyone,
    AdminOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub connection_id: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(connection_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            name: name.into(),
            joined_at: Utc::now(),
        }
    }
}

/// Shared playback state of a room.
/// `position` is the playhead at `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub track: Option<Track>,
    pub position: f64,
    pub is_playing: bool,
    pub updated_at: DateTime<Utc>,
}

impl PlaybackState {
    pub fn idle(now: DateTime<Utc>) -> Self {
        Self {
            track: None,
            position: 0.0,
            is_playing: false,
            updated_at: now,
        }
    }

    /// Playhead position at `now`, advancing with wall-clock time while playing
    pub fn position_at(&self, now: DateTime<Utc>) -> f64 {
        if !self.is_playing {
            return self.position;
        }
        let elapsed = (now - self.updated_at).num_milliseconds().max(0) as f64 / 1000.0;
        self.position + elapsed
    }
}

/// In-memory Jam room
#[derive(Debug, Clone)]
pub struct JamRoom {
    pub id: String,
    pub admin: String,
    pub members: Vec<Member>,
    pub playback: PlaybackState,
    pub policy: ControlPolicy,
    pub created_at: DateTime<Utc>,
}

impl JamRoom {
    pub fn new(id: String, creator: Member, policy: ControlPolicy, now: DateTime<Utc>) -> Self {
        Self {
            id,
            admin: creator.connection_id.clone(),
            members: vec![creator],
            playback: PlaybackState::idle(now),
            policy,
            created_at: now,
        }
    }

    pub fn has_member(&self, connection_id: &str) -> bool {
        self.members.iter().any(|m| m.connection_id == connection_id)
    }

    pub fn member(&self, connection_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.connection_id == connection_id)
    }

    pub fn is_admin(&self, connection_id: &str) -> bool {
        self.admin == connection_id
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.connection_id.clone()).collect()
    }

    /// All member ids except `connection_id`
    pub fn others(&self, connection_id: &str) -> Vec<String> {
        self.members
            .iter()
            .filter(|m| m.connection_id != connection_id)
            .map(|m| m.connection_id.clone())
            .collect()
    }

    pub fn can_control(&self, connection_id: &str) -> bool {
        match self.policy {
            ControlPolicy::Everyone => self.has_member(connection_id),
            ControlPolicy::AdminOnly => self.is_admin(connection_id),
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> JamSnapshot {
        JamSnapshot {
            id: self.id.clone(),
            admin: self.admin.clone(),
            members: self
                .members
                .iter()
                .map(|m| MemberView {
                    connection_id: m.connection_id.clone(),
                    name: m.name.clone(),
                    is_admin: m.connection_id == self.admin,
                })
                .collect(),
            track: self.playback.track.clone(),
            position: self.playback.position_at(now),
            is_playing: self.playback.is_playing,
            policy: self.policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub connection_id: String,
    pub name: String,
    pub is_admin: bool,
}

/// Point-in-time view of a room, safe to hand out of the registry lock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JamSnapshot {
    pub id: String,
    pub admin: String,
    pub members: Vec<MemberView>,
    pub track: Option<Track>,
    pub position: f64,
    pub is_playing: bool,
    pub policy: ControlPolicy,
}

impl JamSnapshot {
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.connection_id.clone()).collect()
    }
}
