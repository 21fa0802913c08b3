//! Synthesized "Happy Birthday", played when the song file cannot be.

use crate::error::AudioError;
use crate::instruments::Tone;
use crate::platform::{AudioSystem, ContextState};
use crate::score::Score;

/// One melody note
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pub frequency: f32, // Hz
    pub duration: f32,  // seconds
}

const fn note(frequency: f32, duration: f32) -> Note {
    Note { frequency, duration }
}

/// The tune in G major, phrase by phrase
pub const HAPPY_BIRTHDAY: [Note; 25] = [
    // Happy birthday to you
    note(392.0, 0.4),
    note(392.0, 0.4),
    note(440.0, 0.8),
    note(392.0, 0.8),
    note(523.0, 0.8),
    note(494.0, 1.2),
    // Happy birthday to you
    note(392.0, 0.4),
    note(392.0, 0.4),
    note(440.0, 0.8),
    note(392.0, 0.8),
    note(587.0, 0.8),
    note(523.0, 1.2),
    // Happy birthday dear ...
    note(392.0, 0.4),
    note(392.0, 0.4),
    note(784.0, 0.8),
    note(659.0, 0.8),
    note(523.0, 0.8),
    note(494.0, 0.8),
    note(440.0, 1.2),
    // Happy birthday to you
    note(698.0, 0.4),
    note(698.0, 0.4),
    note(659.0, 0.8),
    note(523.0, 0.8),
    note(587.0, 0.8),
    note(523.0, 1.6),
];

/// Peak gain of every melody note
pub const MELODY_GAIN: f32 = 0.4;

/// Sum of all note durations
pub fn melody_duration() -> f32 {
    HAPPY_BIRTHDAY.iter().map(|n| n.duration).sum()
}

/// Lay the notes end to end, each with a short attack and release
pub fn melody_score(sample_rate: f32) -> Score {
    let mut score = Score::new();
    let mut time = 0.0;
    for n in HAPPY_BIRTHDAY.iter() {
        score.add(time, Tone::note(sample_rate, n.frequency, n.duration, MELODY_GAIN));
        time += n.duration;
    }
    score
}

/// Schedule the melody on a fresh context.
///
/// Returns the scheduled length in seconds, or `None` when nothing could be
/// scheduled. Failures are logged here and never reach the caller. Repeated
/// calls overlap.
pub fn play_melody_fallback(system: &mut AudioSystem) -> Option<f32> {
    match schedule_melody(system) {
        Ok(seconds) => {
            log::info!("Melody scheduled to play for {:.1} seconds", seconds);
            Some(seconds)
        }
        Err(err) => {
            log::error!("Melody failed: {}", err);
            None
        }
    }
}

fn schedule_melody(system: &mut AudioSystem) -> Result<f32, AudioError> {
    let mut context = system.create_context()?;

    if context.state() == ContextState::Suspended {
        // Scheduling goes ahead either way; voices start once the stream runs
        if let Err(err) = system.resume_context(&mut context) {
            log::warn!("Audio context could not be resumed: {}", err);
        }
    }

    context.schedule(melody_score(system.engine().sample_rate()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melody_lasts_eighteen_point_eight_seconds() {
        assert!((melody_duration() - 18.8).abs() < 1e-4);
        let score = melody_score(8000.0);
        assert_eq!(score.len(), 25);
        assert!((score.duration() - 18.8).abs() < 1e-3);
    }

    #[test]
    fn test_notes_follow_each_other() {
        let score = melody_score(8000.0);
        let starts: Vec<f32> = score.voices().map(|v| v.start).collect();
        assert_eq!(starts[0], 0.0);
        assert!((starts[1] - 0.4).abs() < 1e-6);
        assert!((starts[2] - 0.8).abs() < 1e-6);
        assert!((starts[6] - 4.4).abs() < 1e-4);
    }
}
