use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use super::{
    service::AddOutcome,
    types::{AddToPlaylistRequest, PlaylistEntryResponse, RemoveFromPlaylistRequest},
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// GET /api/playlist
#[instrument(name = "list_playlist", skip(state, claims), fields(user_id = %claims.user_id))]
pub async fn list_playlist(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<Vec<PlaylistEntryResponse>>, AppError> {
    let entries = state.playlist_service.list(&claims.user_id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /api/playlist
/// 201 with the new entry, 200 with the existing one
#[instrument(name = "add_to_playlist", skip(state, claims, request), fields(user_id = %claims.user_id))]
pub async fn add_to_playlist(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<AddToPlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistEntryResponse>), AppError> {
    let outcome = state
        .playlist_service
        .add(
            &claims.user_id,
            &request.video_id,
            &request.title,
            request.thumbnail,
        )
        .await?;

    Ok(match outcome {
        AddOutcome::Added(entry) => (StatusCode::CREATED, Json(entry.into())),
        AddOutcome::AlreadyPresent(entry) => (StatusCode::OK, Json(entry.into())),
    })
}

/// DELETE /api/playlist/:video_id
#[instrument(name = "remove_from_playlist", skip(state, claims), fields(user_id = %claims.user_id))]
pub async fn remove_from_playlist(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(video_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .playlist_service
        .remove(&claims.user_id, &video_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/playlist with `{ video_id }` body
#[instrument(name = "remove_from_playlist_body", skip(state, claims, request), fields(user_id = %claims.user_id))]
pub async fn remove_from_playlist_body(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<RemoveFromPlaylistRequest>,
) -> Result<StatusCode, AppError> {
    state
        .playlist_service
        .remove(&claims.user_id, &request.video_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
