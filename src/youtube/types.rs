use serde::{Deserialize, Serialize};

/// One search hit, flattened from the YouTube API shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub max_results: Option<u32>,
}

/// Keys the browser needs; never baked into the page
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfigResponse {
    pub youtube_api_key: Option<String>,
    pub google_client_id: Option<String>,
}

// search.list wire format; only the fields Pixel Music reads
#[derive(Debug, Deserialize)]
pub(super) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Thumbnails {
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Thumbnail {
    pub url: String,
}

impl SearchListResponse {
    pub fn into_results(self) -> Vec<VideoResult> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let thumbnails = item.snippet.thumbnails;
                let thumbnail = thumbnails
                    .medium
                    .or(thumbnails.high)
                    .or(thumbnails.default)
                    .map(|t| t.url);
                Some(VideoResult {
                    video_id,
                    title: item.snippet.title,
                    channel: item.snippet.channel_title,
                    thumbnail,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_flattening_skips_non_videos() {
        let raw = r#"{
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "abc"},
                 "snippet": {"title": "Lofi beats", "channelTitle": "Chill",
                             "thumbnails": {"default": {"url": "d.jpg"}, "medium": {"url": "m.jpg"}}}},
                {"id": {"kind": "youtube#channel", "channelId": "xyz"},
                 "snippet": {"title": "A channel", "channelTitle": "A channel"}}
            ]
        }"#;
        let response: SearchListResponse = serde_json::from_str(raw).unwrap();

        let results = response.into_results();

        assert_eq!(
            results,
            vec![VideoResult {
                video_id: "abc".to_string(),
                title: "Lofi beats".to_string(),
                channel: "Chill".to_string(),
                thumbnail: Some("m.jpg".to_string()),
            }]
        );
    }
}
