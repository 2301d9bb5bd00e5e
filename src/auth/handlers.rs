use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest};
use crate::shared::{AppError, AppState};

/// POST /api/register
#[instrument(name = "register", skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state
        .auth_service
        .register(&request.email, &request.password, request.name.as_deref())
        .await?;
    info!(user_id = %response.user.id, "Registration succeeded");
    Ok(Json(response))
}

/// POST /api/login
#[instrument(name = "login", skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// POST /api/google-login
#[instrument(name = "google_login", skip(state, request))]
pub async fn google_login(
    State(state): State<AppState>,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth_service.google_login(&request.credential).await?;
    Ok(Json(response))
}
