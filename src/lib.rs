//! Countdown-gated birthday card with synthesized fallback music

pub mod app;
pub mod card;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod input;
pub mod schedule;
pub mod state;

// Visuals
pub mod gallery;
pub mod particles;
pub mod view;

// Audio
pub mod effects;
pub mod envelope;
pub mod gen;
pub mod instruments;
pub mod music;
pub mod score;
pub mod stage;

// Platform abstraction layer
pub mod platform;

pub mod utils;

pub use app::{Controller, TickOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CardConfig;
pub use error::{AudioError, ConfigError};
