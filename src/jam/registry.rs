use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::Display;
use thiserror::Error;

use super::models::{ControlPolicy, JamRoom, JamSnapshot, Member, Track};

const MAX_ROOM_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JamError {
    #[error("You are not in a jam")]
    NotInRoom,

    #[error("Only the jam admin can do that")]
    NotAdmin,

    #[error("Invalid jam code: {0}")]
    InvalidRoomId(String),

    #[error("Invalid playback position: {0}")]
    InvalidPosition(f64),

    #[error("Nothing is queued in this jam")]
    NothingToPlay,

    #[error("Track is missing a video id")]
    InvalidTrack,

    #[error("Jam {0} is full")]
    RoomFull(String),

    #[error("{0} is not a member of this jam")]
    NotAMember(String),

    #[error("Already in jam {0}")]
    AlreadyInRoom(String),
}

/// Playback change requested by a member
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Start `track` from `position`, or resume the current track
    Play {
        track: Option<Track>,
        position: Option<f64>,
    },
    Pause {
        position: Option<f64>,
    },
    Seek {
        position: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControlAction {
    Play,
    Pause,
    Seek,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackChange {
    TrackChanged {
        track: Track,
        position: f64,
    },
    Control {
        action: ControlAction,
        position: f64,
        is_playing: bool,
    },
}

/// Result of an accepted playback command
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackUpdate {
    pub room_id: String,
    pub by: Member,
    pub change: PlaybackChange,
    /// Every member except the sender
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub snapshot: JamSnapshot,
    pub created: bool,
    pub already_member: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaveOutcome {
    Left {
        room_id: String,
        member: Member,
        new_admin: Option<Member>,
    },
    /// Last member left and the room was removed
    RoomClosed { room_id: String, member: Member },
    NotInRoom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminChange {
    pub room_id: String,
    pub old_admin: String,
    pub new_admin: Member,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndedJam {
    pub room_id: String,
    pub ended_by: Member,
    pub members: Vec<Member>,
}

/// Volatile room registry.
///
/// Holds every Jam room and the connection → room index. All methods are
/// synchronous; callers serialize access.
#[derive(Debug)]
pub struct JamRegistry {
    rooms: HashMap<String, JamRoom>,
    memberships: HashMap<String, String>,
    max_members: usize,
}

impl JamRegistry {
    pub fn new(max_members: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            max_members: max_members.max(1),
        }
    }

    /// Trims a room id and checks it against the allowed alphabet
    pub fn normalize_room_id(raw: &str) -> Result<String, JamError> {
        let id = raw.trim();
        let valid = !id.is_empty()
            && id.len() <= MAX_ROOM_ID_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(id.to_string())
        } else {
            Err(JamError::InvalidRoomId(raw.to_string()))
        }
    }

    pub fn room_of(&self, connection_id: &str) -> Option<&str> {
        self.memberships.get(connection_id).map(String::as_str)
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn snapshot(&self, room_id: &str, now: DateTime<Utc>) -> Option<JamSnapshot> {
        self.rooms.get(room_id).map(|room| room.snapshot(now))
    }

    /// Snapshots of every live room, ordered by room id
    pub fn list(&self, now: DateTime<Utc>) -> Vec<JamSnapshot> {
        let mut snapshots: Vec<JamSnapshot> =
            self.rooms.values().map(|room| room.snapshot(now)).collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Checks that `connection_id` could join `room_id` once it has left any
    /// other room, returning the normalized id
    pub fn check_join(&self, room_id: &str, connection_id: &str) -> Result<String, JamError> {
        let room_id = Self::normalize_room_id(room_id)?;
        if let Some(room) = self.rooms.get(&room_id) {
            if !room.has_member(connection_id) && room.members.len() >= self.max_members {
                return Err(JamError::RoomFull(room_id));
            }
        }
        Ok(room_id)
    }

    /// Adds `member` to `room_id`, creating the room with `policy` if absent.
    /// The connection must not be in another room.
    pub fn join(
        &mut self,
        room_id: &str,
        member: Member,
        policy: ControlPolicy,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, JamError> {
        let room_id = Self::normalize_room_id(room_id)?;

        if let Some(current) = self.memberships.get(&member.connection_id) {
            if *current != room_id {
                return Err(JamError::AlreadyInRoom(current.clone()));
            }
        }

        let connection_id = member.connection_id.clone();
        let (snapshot, created, already_member) = match self.rooms.get_mut(&room_id) {
            Some(room) if room.has_member(&connection_id) => (room.snapshot(now), false, true),
            Some(room) => {
                if room.members.len() >= self.max_members {
                    return Err(JamError::RoomFull(room_id));
                }
                room.members.push(member);
                (room.snapshot(now), false, false)
            }
            None => {
                let room = JamRoom::new(room_id.clone(), member, policy, now);
                let snapshot = room.snapshot(now);
                self.rooms.insert(room_id.clone(), room);
                (snapshot, true, false)
            }
        };

        self.memberships.insert(connection_id, room_id);

        Ok(JoinOutcome {
            snapshot,
            created,
            already_member,
        })
    }

    /// Removes a connection from its room, promoting the longest-present
    /// member if the admin left and deleting the room once empty
    pub fn leave(&mut self, connection_id: &str) -> LeaveOutcome {
        let Some(room_id) = self.memberships.remove(connection_id) else {
            return LeaveOutcome::NotInRoom;
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return LeaveOutcome::NotInRoom;
        };
        let Some(index) = room
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)
        else {
            return LeaveOutcome::NotInRoom;
        };

        let member = room.members.remove(index);

        if room.members.is_empty() {
            self.rooms.remove(&room_id);
            return LeaveOutcome::RoomClosed { room_id, member };
        }

        let new_admin = if room.admin == connection_id {
            let successor = room.members[0].clone();
            room.admin = successor.connection_id.clone();
            Some(successor)
        } else {
            None
        };

        LeaveOutcome::Left {
            room_id,
            member,
            new_admin,
        }
    }

    /// Applies a playback command sent from `room_id`
    pub fn apply(
        &mut self,
        room_id: &str,
        connection_id: &str,
        command: PlaybackCommand,
        now: DateTime<Utc>,
    ) -> Result<PlaybackUpdate, JamError> {
        let room = self.room_for_mut(room_id, connection_id)?;
        if !room.can_control(connection_id) {
            return Err(JamError::NotAdmin);
        }

        let current = room.playback.position_at(now);
        let playback = &mut room.playback;

        let change = match command {
            PlaybackCommand::Play {
                track: Some(track),
                position,
            } => {
                if track.video_id.trim().is_empty() {
                    return Err(JamError::InvalidTrack);
                }
                let position = validate_position(position.unwrap_or(0.0))?;
                playback.track = Some(track.clone());
                playback.position = position;
                playback.is_playing = true;
                PlaybackChange::TrackChanged { track, position }
            }
            PlaybackCommand::Play {
                track: None,
                position,
            } => {
                if playback.track.is_none() {
                    return Err(JamError::NothingToPlay);
                }
                let position = validate_position(position.unwrap_or(current))?;
                playback.position = position;
                playback.is_playing = true;
                PlaybackChange::Control {
                    action: ControlAction::Play,
                    position,
                    is_playing: true,
                }
            }
            PlaybackCommand::Pause { position } => {
                let position = validate_position(position.unwrap_or(current))?;
                playback.position = position;
                playback.is_playing = false;
                PlaybackChange::Control {
                    action: ControlAction::Pause,
                    position,
                    is_playing: false,
                }
            }
            PlaybackCommand::Seek { position } => {
                let position = validate_position(position)?;
                playback.position = position;
                PlaybackChange::Control {
                    action: ControlAction::Seek,
                    position,
                    is_playing: playback.is_playing,
                }
            }
        };
        playback.updated_at = now;

        let by = room
            .member(connection_id)
            .cloned()
            .ok_or(JamError::NotInRoom)?;

        Ok(PlaybackUpdate {
            room_id: room.id.clone(),
            by,
            change,
            recipients: room.others(connection_id),
        })
    }

    pub fn transfer_admin(
        &mut self,
        room_id: &str,
        connection_id: &str,
        target: &str,
    ) -> Result<AdminChange, JamError> {
        let room = self.room_for_mut(room_id, connection_id)?;
        if !room.is_admin(connection_id) {
            return Err(JamError::NotAdmin);
        }
        let new_admin = room
            .member(target)
            .cloned()
            .ok_or_else(|| JamError::NotAMember(target.to_string()))?;

        room.admin = new_admin.connection_id.clone();

        Ok(AdminChange {
            room_id: room.id.clone(),
            old_admin: connection_id.to_string(),
            new_admin,
        })
    }

    /// Terminates the room; only its admin may do so
    pub fn end(&mut self, room_id: &str, connection_id: &str) -> Result<EndedJam, JamError> {
        let room = self.room_for_mut(room_id, connection_id)?;
        if !room.is_admin(connection_id) {
            return Err(JamError::NotAdmin);
        }
        let room_id = room.id.clone();

        let room = self.rooms.remove(&room_id).ok_or(JamError::NotInRoom)?;
        for member in &room.members {
            self.memberships.remove(&member.connection_id);
        }

        let ended_by = room
            .member(connection_id)
            .cloned()
            .ok_or(JamError::NotInRoom)?;

        Ok(EndedJam {
            room_id,
            ended_by,
            members: room.members,
        })
    }

    /// The room `connection_id` is in, provided it is still `room_id`
    fn room_for_mut(&mut self, room_id: &str, connection_id: &str) -> Result<&mut JamRoom, JamError> {
        match self.memberships.get(connection_id) {
            Some(current) if current == room_id => {}
            _ => return Err(JamError::NotInRoom),
        }
        self.rooms.get_mut(room_id).ok_or(JamError::NotInRoom)
    }
}

fn validate_position(position: f64) -> Result<f64, JamError> {
    if position.is_finite() && position >= 0.0 {
        Ok(position)
    } else {
        Err(JamError::InvalidPosition(position))
    }
}
