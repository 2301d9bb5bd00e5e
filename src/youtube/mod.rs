// Public API - what other modules can use
pub use client::{VideoSearch, YouTubeClient};
pub use handlers::{get_config, search_videos};
pub use types::{ClientConfigResponse, VideoResult};

// Internal modules
mod client;
mod handlers;
mod types;
