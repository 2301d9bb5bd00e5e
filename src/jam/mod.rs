// Public API - what other modules can use
pub use handlers::{create_jam, get_jam, list_jams};
pub use models::{ControlPolicy, JamRoom, JamSnapshot, Member, MemberView, PlaybackState, Track};
pub use registry::{
    AdminChange, ControlAction, EndedJam, JamError, JamRegistry, JoinOutcome, LeaveOutcome,
    PlaybackChange, PlaybackCommand, PlaybackUpdate,
};
pub use service::{JamService, JoinResult};

// Internal modules
mod handlers;
pub mod models;
pub mod registry;
pub mod service;
mod types;
