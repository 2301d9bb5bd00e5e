use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the playlist_entries table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PlaylistEntryModel {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl PlaylistEntryModel {
    pub fn new(user_id: &str, video_id: &str, title: &str, thumbnail: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            video_id: video_id.to_string(),
            title: title.to_string(),
            thumbnail,
            added_at: Utc::now(),
        }
    }
}
