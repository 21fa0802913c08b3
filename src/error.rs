use std::path::PathBuf;

/// Errors from starting or scheduling audio.
///
/// None of these are fatal: the music layer resolves every one of them into a
/// fallback or a short user-facing notice.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// No song file is part of the card
    #[error("no song file configured")]
    NoSong,

    /// The configured song file does not exist
    #[error("song file {} not found", .0.display())]
    SongMissing(PathBuf),

    /// The song file exists but could not be decoded
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// No audio device could be opened
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),

    /// The device exists but refused to start; retried on the next interaction
    #[error("audio playback blocked: {0}")]
    Blocked(String),

    /// The audio thread panicked while holding the stage
    #[error("audio engine lock poisoned")]
    Poisoned,
}

/// Errors from loading a card description
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed card description {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid birthday '{0}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    Date(String),
}
