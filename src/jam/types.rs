use serde::{Deserialize, Serialize};

use super::models::{ControlPolicy, JamSnapshot, MemberView, Track};

/// Response for `POST /api/jam`
#[derive(Debug, Serialize, Deserialize)]
pub struct JamCodeResponse {
    pub room_id: String,
}

/// Public view of a Jam room
#[derive(Debug, Serialize, Deserialize)]
pub struct JamResponse {
    pub room_id: String,
    pub admin: String,
    pub members: Vec<MemberView>,
    pub track: Option<Track>,
    pub position: f64,
    pub is_playing: bool,
    pub policy: ControlPolicy,
}

impl From<JamSnapshot> for JamResponse {
    fn from(snapshot: JamSnapshot) -> Self {
        Self {
            room_id: snapshot.id,
            admin: snapshot.admin,
            members: snapshot.members,
            track: snapshot.track,
            position: snapshot.position,
            is_playing: snapshot.is_playing,
            policy: snapshot.policy,
        }
    }
}
