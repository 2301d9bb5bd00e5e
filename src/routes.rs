use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{auth, jam, playlist, stream, web, websockets, youtube};

/// Builds the full HTTP + WebSocket router
pub fn build_router(app_state: AppState) -> Router {
    let playlist_routes = Router::new()
        .route(
            "/api/playlist",
            get(playlist::list_playlist)
                .post(playlist::add_to_playlist)
                .delete(playlist::remove_from_playlist_body),
        )
        .route(
            "/api/playlist/:video_id",
            delete(playlist::remove_from_playlist),
        )
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::jwt_auth,
        ));

    Router::new()
        .route("/", get(web::index))
        .route("/health", get(web::health))
        .route("/ws", get(websockets::websocket_handler))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/google-login", post(auth::google_login))
        .route("/api/config", get(youtube::get_config))
        .route("/api/search", get(youtube::search_videos))
        .route("/api/jam", post(jam::create_jam).get(jam::list_jams))
        .route("/api/jam/:room_id", get(jam::get_jam))
        // GET routes answer HEAD as well
        .route("/stream-audio", get(stream::stream_audio))
        .merge(playlist_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
