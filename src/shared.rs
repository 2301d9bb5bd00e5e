use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{
    AuthService, GoogleTokenVerifier, HttpGoogleTokenVerifier, InMemoryUserRepository,
    TokenConfig, UserRepository,
};
use crate::config::AppConfig;
use crate::event::{EventBus, RoomEventHandler};
use crate::jam::JamService;
use crate::playlist::{InMemoryPlaylistRepository, PlaylistRepository, PlaylistService};
use crate::websockets::{ConnectionManager, InMemoryConnectionManager, JamRoomSubscriber};
use crate::youtube::{VideoSearch, YouTubeClient};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: Arc<AuthService>,
    pub playlist_service: Arc<PlaylistService>,
    pub jam_service: Arc<JamService>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub jam_subscriber: Arc<dyn RoomEventHandler>,
    pub video_search: Arc<dyn VideoSearch>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        user_repository: Arc<dyn UserRepository>,
        playlist_repository: Arc<dyn PlaylistRepository>,
        google_verifier: Arc<dyn GoogleTokenVerifier>,
        video_search: Arc<dyn VideoSearch>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            user_repository,
            google_verifier,
            TokenConfig::new(config.jwt_secret.clone(), config.session_expiration_days),
        ));
        let playlist_service = Arc::new(PlaylistService::new(playlist_repository));

        let event_bus = EventBus::new(config.jam.channel_capacity);
        let jam_service = Arc::new(JamService::new(
            event_bus,
            config.jam.max_members,
            config.jam.default_policy,
        ));
        let connection_manager: Arc<dyn ConnectionManager> =
            Arc::new(InMemoryConnectionManager::new());
        let jam_subscriber = Arc::new(JamRoomSubscriber::new(
            Arc::clone(&jam_service),
            Arc::clone(&connection_manager),
        ));

        Self {
            config: Arc::new(config),
            auth_service,
            playlist_service,
            jam_service,
            connection_manager,
            jam_subscriber,
            video_search,
        }
    }

    /// State using the live Google and YouTube clients over the given repositories
    pub fn with_repositories(
        config: AppConfig,
        user_repository: Arc<dyn UserRepository>,
        playlist_repository: Arc<dyn PlaylistRepository>,
    ) -> Self {
        let http = reqwest::Client::new();
        let google = Arc::new(HttpGoogleTokenVerifier::new(
            http.clone(),
            config.google_client_id.clone(),
        ));
        let search = Arc::new(YouTubeClient::new(http, config.youtube_api_key.clone()));
        Self::new(config, user_repository, playlist_repository, google, search)
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_repositories(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPlaylistRepository::new()),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
