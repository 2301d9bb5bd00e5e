use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::PlaylistEntryModel;

#[derive(Debug, Deserialize)]
pub struct AddToPlaylistRequest {
    #[serde(alias = "videoId")]
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromPlaylistRequest {
    #[serde(alias = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistEntryResponse {
    pub id: String,
    pub video_id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistEntryModel> for PlaylistEntryResponse {
    fn from(entry: PlaylistEntryModel) -> Self {
        Self {
            id: entry.id,
            video_id: entry.video_id,
            title: entry.title,
            thumbnail: entry.thumbnail,
            added_at: entry.added_at,
        }
    }
}
