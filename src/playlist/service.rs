use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::PlaylistEntryModel, repository::PlaylistRepository};
use crate::shared::AppError;

/// Outcome of adding a video to a playlist
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(PlaylistEntryModel),
    AlreadyPresent(PlaylistEntryModel),
}

/// Service for per-user playlist business logic
pub struct PlaylistService {
    repository: Arc<dyn PlaylistRepository>,
}

impl PlaylistService {
    pub fn new(repository: Arc<dyn PlaylistRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<PlaylistEntryModel>, AppError> {
        self.repository.list_entries(user_id).await
    }

    #[instrument(skip(self, thumbnail))]
    pub async fn add(
        &self,
        user_id: &str,
        video_id: &str,
        title: &str,
        thumbnail: Option<String>,
    ) -> Result<AddOutcome, AppError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(AppError::BadRequest("video_id is required".to_string()));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }

        if let Some(existing) = self.repository.find_entry(user_id, video_id).await? {
            return Ok(AddOutcome::AlreadyPresent(existing));
        }

        let entry = PlaylistEntryModel::new(user_id, video_id, title, thumbnail);
        match self.repository.add_entry(&entry).await {
            Ok(()) => {
                info!(user_id = %user_id, video_id = %video_id, "Video added to playlist");
                Ok(AddOutcome::Added(entry))
            }
            // Lost a race with a concurrent add of the same video
            Err(AppError::Conflict(_)) => self
                .repository
                .find_entry(user_id, video_id)
                .await?
                .map(AddOutcome::AlreadyPresent)
                .ok_or(AppError::Internal),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: &str, video_id: &str) -> Result<(), AppError> {
        if self.repository.remove_entry(user_id, video_id.trim()).await? {
            info!(user_id = %user_id, video_id = %video_id, "Video removed from playlist");
            Ok(())
        } else {
            Err(AppError::NotFound("Video not in playlist".to_string()))
        }
    }
}
