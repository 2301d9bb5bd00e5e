// Public API - what other modules can use
pub use handlers::{add_to_playlist, list_playlist, remove_from_playlist, remove_from_playlist_body};
pub use repository::{InMemoryPlaylistRepository, PlaylistRepository, PostgresPlaylistRepository};
pub use service::{AddOutcome, PlaylistService};
pub use types::PlaylistEntryResponse;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
