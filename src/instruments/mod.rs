pub mod kick;
pub mod snare;
pub mod tone;

pub use self::kick::*;
pub use self::snare::*;
pub use self::tone::*;

/// A scheduled sound with a fixed lifetime.
///
/// Voices are rendered on the audio thread, so they must be `Send`. `sample`
/// receives the time in seconds since the voice started.
pub trait Voice: Send {
    /// Generate one sample of audio `elapsed` seconds into the voice
    fn sample(&self, elapsed: f32) -> f32;

    /// How long the voice sounds, in seconds
    fn duration(&self) -> f32;
}
