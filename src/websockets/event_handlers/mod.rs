pub mod membership_events;
pub mod playback_events;
pub mod shared;

pub use membership_events::MembershipEventHandlers;
pub use playback_events::PlaybackEventHandlers;
