use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{JamCodeResponse, JamResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for suggesting an unused jam code
///
/// POST /api/jam
/// Nothing is reserved; the room is created by the first WebSocket `join`
#[instrument(name = "create_jam", skip(state))]
pub async fn create_jam(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<JamCodeResponse>), AppError> {
    let room_id = state.jam_service.generate_room_code().await;
    info!(room_id = %room_id, "Generated jam code");
    Ok((StatusCode::CREATED, Json(JamCodeResponse { room_id })))
}

/// HTTP handler for listing live jams
///
/// GET /api/jam
#[instrument(name = "list_jams", skip(state))]
pub async fn list_jams(State(state): State<AppState>) -> Json<Vec<JamResponse>> {
    let jams = state.jam_service.list().await;
    Json(jams.into_iter().map(Into::into).collect())
}

/// HTTP handler for inspecting a live jam
///
/// GET /api/jam/:room_id
#[instrument(name = "get_jam", skip(state))]
pub async fn get_jam(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<JamResponse>, AppError> {
    let snapshot = state
        .jam_service
        .snapshot(&room_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Jam {} not found", room_id)))?;
    Ok(Json(snapshot.into()))
}
