//! Time-ordered collections of voices, the unit handed to an audio context.

use crate::instruments::Voice;

/// A voice pinned to a start offset inside a score
pub struct ScheduledVoice {
    pub start: f32,
    pub voice: Box<dyn Voice>,
}

impl ScheduledVoice {
    pub fn end(&self) -> f32 {
        self.start + self.voice.duration()
    }
}

/// Voices ordered by start time. Offsets are seconds from the moment the score
/// starts playing.
#[derive(Default)]
pub struct Score {
    voices: Vec<ScheduledVoice>,
    duration: f32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `voice` at `start` seconds
    pub fn add(&mut self, start: f32, voice: impl Voice + 'static) {
        self.add_boxed(start, Box::new(voice));
    }

    pub fn add_boxed(&mut self, start: f32, voice: Box<dyn Voice>) {
        let scheduled = ScheduledVoice {
            start: start.max(0.0),
            voice,
        };
        self.duration = self.duration.max(scheduled.end());

        let position = self
            .voices
            .iter()
            .position(|existing| existing.start > scheduled.start)
            .unwrap_or(self.voices.len());
        self.voices.insert(position, scheduled);
    }

    /// End of the latest voice, in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn voices(&self) -> impl Iterator<Item = &ScheduledVoice> {
        self.voices.iter()
    }

    /// Mix every voice sounding at `elapsed`
    pub fn sample(&self, elapsed: f32) -> f32 {
        let mut output = 0.0;
        for scheduled in &self.voices {
            if scheduled.start > elapsed {
                break;
            }
            if elapsed < scheduled.end() {
                output += scheduled.voice.sample(elapsed - scheduled.start);
            }
        }
        output
    }
}
