use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pixel_music::{build_router, AppConfig, AppState};

fn test_app() -> Router {
    test_app_with(|_| {})
}

fn test_app_with(configure: impl FnOnce(&mut AppConfig)) -> Router {
    let mut config = AppConfig {
        jwt_secret: "api-test-secret".to_string(),
        ..AppConfig::default()
    };
    configure(&mut config);
    build_router(AppState::in_memory(config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "email": email, "password": "hunter22", "name": "Test User" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

// ============================================================================
// Pages and config
// ============================================================================

#[tokio::test]
async fn test_health_and_index_are_served() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Pixel Music is alive and ready for streaming!");

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("<html"));
}

#[tokio::test]
async fn test_config_exposes_client_keys() {
    let app = test_app_with(|config| {
        config.youtube_api_key = Some("yt-key".to_string());
        config.google_client_id = Some("client-id".to_string());
    });

    let (status, body) = send(&app, Method::GET, "/api/config", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["youtube_api_key"], "yt-key");
    assert_eq!(body["google_client_id"], "client-id");
}

#[tokio::test]
async fn test_search_without_api_key_is_unavailable() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/api/search?q=lofi", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_google_login_without_client_id_is_unavailable() {
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/google-login",
        None,
        Some(json!({ "credential": "fake" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = test_app();
    register(&app, "listener@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "Listener@Example.com", "password": "hunter22" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "listener@example.com");
    assert_eq!(body["user"]["name"], "Test User");
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = test_app();
    register(&app, "listener@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "email": "listener@example.com", "password": "another1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = test_app();
    register(&app, "listener@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "listener@example.com", "password": "wrong-one" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Playlist
// ============================================================================

#[tokio::test]
async fn test_playlist_requires_a_token() {
    let app = test_app();

    let (status, _) = send(&app, Method::GET, "/api/playlist", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/playlist", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_playlist_add_list_remove() {
    let app = test_app();
    let token = register(&app, "listener@example.com").await;
    let song = json!({ "video_id": "abc123", "title": "Lofi Beats", "thumbnail": "https://i.ytimg.com/x.jpg" });

    let (status, body) = send(&app, Method::POST, "/api/playlist", Some(&token), Some(song.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["video_id"], "abc123");

    let (status, _) = send(&app, Method::POST, "/api/playlist", Some(&token), Some(song)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/playlist", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Lofi Beats");

    let (status, _) = send(&app, Method::DELETE, "/api/playlist/abc123", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, "/api/playlist/abc123", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/playlist", Some(&token), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_playlists_are_per_user() {
    let app = test_app();
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    send(
        &app,
        Method::POST,
        "/api/playlist",
        Some(&alice),
        Some(json!({ "videoId": "only-alice", "title": "Mine" })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/api/playlist", Some(&bob), None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/playlist",
        Some(&bob),
        Some(json!({ "video_id": "only-alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Jams and streaming
// ============================================================================

#[tokio::test]
async fn test_suggested_jam_code_is_not_live_until_joined() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/api/jam", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = body["room_id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::GET, &format!("/api/jam/{}", room_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/jam", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stream_audio_missing_file_is_not_found() {
    let app = test_app_with(|config| {
        config.music_file_path = std::env::temp_dir().join("pixel-music-no-such-file.mp3");
    });

    let (status, _) = send(&app, Method::GET, "/stream-audio", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stream_audio_serves_ranges() {
    let path = std::env::temp_dir().join(format!("pixel-music-api-{}.mp3", std::process::id()));
    tokio::fs::write(&path, vec![7u8; 2048]).await.unwrap();
    let app = test_app_with(|config| config.music_file_path = path.clone());

    let request = Request::builder()
        .uri("/stream-audio")
        .header(header::RANGE, "bytes=0-99")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()[header::CONTENT_RANGE],
        "bytes 0-99/2048"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.len(), 100);

    tokio::fs::remove_file(&path).await.ok();
}
