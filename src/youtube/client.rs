use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::types::{SearchListResponse, VideoResult};
use crate::shared::AppError;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<VideoResult>, AppError>;
}

/// YouTube Data API v3 `search.list` client
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl YouTubeClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: SEARCH_URL.to_string(),
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<VideoResult>, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Unavailable("YouTube search is not configured".to_string())
        })?;

        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", api_key),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "YouTube search request failed");
                AppError::Upstream("YouTube search failed".to_string())
            })?;

        let body: SearchListResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Malformed YouTube search response");
            AppError::Upstream("YouTube search failed".to_string())
        })?;

        let results = body.into_results();
        debug!(count = results.len(), "YouTube search completed");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let client = YouTubeClient::new(reqwest::Client::new(), None);
        let result = client.search("lofi", 5).await;
        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }
}
