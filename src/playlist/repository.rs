use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::PlaylistEntryModel;
use crate::shared::AppError;

/// Trait for playlist repository operations
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Entries of one user, newest first
    async fn list_entries(&self, user_id: &str) -> Result<Vec<PlaylistEntryModel>, AppError>;
    async fn find_entry(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> Result<Option<PlaylistEntryModel>, AppError>;
    /// Fails with `Conflict` when the user already saved this video
    async fn add_entry(&self, entry: &PlaylistEntryModel) -> Result<(), AppError>;
    /// Returns whether an entry was removed
    async fn remove_entry(&self, user_id: &str, video_id: &str) -> Result<bool, AppError>;
}

/// In-memory implementation of PlaylistRepository for development and testing
pub struct InMemoryPlaylistRepository {
    entries: RwLock<Vec<PlaylistEntryModel>>,
}

impl Default for InMemoryPlaylistRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlaylistRepository {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryPlaylistRepository {
    #[instrument(skip(self))]
    async fn list_entries(&self, user_id: &str) -> Result<Vec<PlaylistEntryModel>, AppError> {
        let entries = self.entries.read().await;
        // Insertion order is chronological
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_entry(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> Result<Option<PlaylistEntryModel>, AppError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|e| e.user_id == user_id && e.video_id == video_id)
            .cloned())
    }

    #[instrument(skip(self, entry))]
    async fn add_entry(&self, entry: &PlaylistEntryModel) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        if entries
            .iter()
            .any(|e| e.user_id == entry.user_id && e.video_id == entry.video_id)
        {
            warn!(user_id = %entry.user_id, video_id = %entry.video_id, "Playlist entry already exists in memory");
            return Err(AppError::Conflict("Video already in playlist".to_string()));
        }
        entries.push(entry.clone());
        debug!(user_id = %entry.user_id, video_id = %entry.video_id, "Playlist entry added in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_entry(&self, user_id: &str, video_id: &str) -> Result<bool, AppError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| !(e.user_id == user_id && e.video_id == video_id));
        Ok(entries.len() < before)
    }
}

/// PostgreSQL implementation of playlist repository
pub struct PostgresPlaylistRepository {
    pool: PgPool,
}

impl PostgresPlaylistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &sqlx::postgres::PgRow) -> PlaylistEntryModel {
    PlaylistEntryModel {
        id: row.get("id"),
        user_id: row.get("user_id"),
        video_id: row.get("video_id"),
        title: row.get("title"),
        thumbnail: row.get("thumbnail"),
        added_at: row.get("added_at"),
    }
}

#[async_trait]
impl PlaylistRepository for PostgresPlaylistRepository {
    #[instrument(skip(self))]
    async fn list_entries(&self, user_id: &str) -> Result<Vec<PlaylistEntryModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, user_id, video_id, title, thumbnail, added_at FROM playlist_entries WHERE user_id = $1 ORDER BY added_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to list playlist from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(user_id = %user_id, count = rows.len(), "Playlist fetched from database");
        Ok(rows.iter().map(entry_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn find_entry(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> Result<Option<PlaylistEntryModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, user_id, video_id, title, thumbnail, added_at FROM playlist_entries WHERE user_id = $1 AND video_id = $2"
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch playlist entry from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(entry_from_row))
    }

    #[instrument(skip(self, entry))]
    async fn add_entry(&self, entry: &PlaylistEntryModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO playlist_entries (id, user_id, video_id, title, thumbnail, added_at) VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.video_id)
        .bind(&entry.title)
        .bind(&entry.thumbnail)
        .bind(entry.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Video already in playlist".to_string())
            }
            e => {
                warn!(error = %e, "Failed to add playlist entry to database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        debug!(user_id = %entry.user_id, video_id = %entry.video_id, "Playlist entry added in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_entry(&self, user_id: &str, video_id: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM playlist_entries WHERE user_id = $1 AND video_id = $2")
                .bind(user_id)
                .bind(video_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, user_id = %user_id, "Failed to remove playlist entry from database");
                    AppError::DatabaseError(e.to_string())
                })?;

        Ok(result.rows_affected() > 0)
    }
}
