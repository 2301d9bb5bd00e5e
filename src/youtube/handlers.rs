use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{ClientConfigResponse, SearchQuery, VideoResult};
use crate::shared::{AppError, AppState};

const MAX_RESULTS_LIMIT: u8 = 50;

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        youtube_api_key: state.config.youtube_api_key.clone(),
        google_client_id: state.config.google_client_id.clone(),
    })
}

/// GET /api/search?q=&max_results=
#[instrument(name = "search_videos", skip(state))]
pub async fn search_videos(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<VideoResult>>, AppError> {
    let Query(query) =
        query.map_err(|e| AppError::BadRequest(format!("Invalid search parameters: {}", e)))?;
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }

    let max_results = query
        .max_results
        .unwrap_or(u32::from(state.config.search_max_results))
        .clamp(1, u32::from(MAX_RESULTS_LIMIT));
    let max_results = u8::try_from(max_results).unwrap_or(MAX_RESULTS_LIMIT);

    let results = state.video_search.search(q, max_results).await?;
    info!(query = %q, count = results.len(), "Search proxied");
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{AppStateBuilder, StubVideoSearch};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/api/config", get(get_config))
            .route("/api/search", get(search_videos))
            .with_state(state)
    }

    async fn get_status(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_config_exposes_nullable_keys() {
        let state = AppStateBuilder::new()
            .with_config(|c| c.youtube_api_key = Some("yt-key".to_string()))
            .build();

        let (status, body) = get_status(app(state), "/api/config").await;

        assert_eq!(status, StatusCode::OK);
        let config: ClientConfigResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(config.youtube_api_key.as_deref(), Some("yt-key"));
        assert!(config.google_client_id.is_none());
    }

    #[tokio::test]
    async fn test_search_returns_results() {
        let state = AppStateBuilder::new()
            .with_video_search(Arc::new(StubVideoSearch::with_results(vec![VideoResult {
                video_id: "abc".to_string(),
                title: "Lofi".to_string(),
                channel: "Chill".to_string(),
                thumbnail: None,
            }])))
            .build();

        let (status, body) = get_status(app(state), "/api/search?q=lofi&max_results=3").await;

        assert_eq!(status, StatusCode::OK);
        let results: Vec<VideoResult> = serde_json::from_slice(&body).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_max_results_is_clamped() {
        let results = (0..60)
            .map(|i| VideoResult {
                video_id: format!("v{}", i),
                title: format!("Track {}", i),
                channel: "Chill".to_string(),
                thumbnail: None,
            })
            .collect();
        let state = AppStateBuilder::new()
            .with_video_search(Arc::new(StubVideoSearch::with_results(results)))
            .build();

        let (status, body) = get_status(app(state), "/api/search?q=lofi&max_results=300").await;

        assert_eq!(status, StatusCode::OK);
        let results: Vec<VideoResult> = serde_json::from_slice(&body).unwrap();
        assert_eq!(results.len(), 50);
    }

    #[tokio::test]
    async fn test_malformed_max_results_gets_json_error() {
        let (status, body) = get_status(
            app(AppStateBuilder::new().build()),
            "/api/search?q=lofi&max_results=lots",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid search parameters"));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let (status, _) = get_status(app(AppStateBuilder::new().build()), "/api/search?q=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_without_key_is_unavailable() {
        let (status, _) = get_status(app(AppStateBuilder::new().build()), "/api/search?q=lofi").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
