//! Song playback and the synthesized fallbacks.
//!
//! Nothing in here returns an error to the card: every failure ends in either
//! the fallback melody or an outcome the controller turns into a notice.

pub mod celebration;
pub mod media;
pub mod melody;
pub mod player;

pub use self::celebration::{CelebrationTrack, TRACK_LIFETIME};
pub use self::media::MediaClip;
pub use self::melody::{melody_duration, play_melody_fallback, HAPPY_BIRTHDAY};
pub use self::player::{Entry, PlaybackOutcome, Player, ToggleOutcome};
