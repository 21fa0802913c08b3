//! Drum, bass and lead loop for the dance action.
//!
//! Only one instance plays at a time: [`CelebrationTrack`] holds the running
//! context and refuses to start another until the loop has run its course.

use crate::envelope::Envelope;
use crate::gen::{Oscillator, Waveform};
use crate::instruments::{Kick, KickConfig, Snare, Tone};
use crate::platform::{AudioContext, AudioSystem};
use crate::score::Score;
use std::time::Duration;

pub const BEAT_SECONDS: f32 = 0.35;
pub const BAR_SECONDS: f32 = BEAT_SECONDS * 4.0;
pub const BARS: usize = 16;

/// How long the handle stays taken after a start
pub const TRACK_LIFETIME: Duration = Duration::from_millis(22_500);

/// Bass pitch for each beat of the bar
const BASS_PATTERN: [f32; 4] = [82.0, 55.0, 82.0, 123.0];
const BASS_GAIN: f32 = 0.08;

/// Lead pitch by `bar % 4`; only even bars carry a lead stab
const LEAD_PATTERN: [f32; 4] = [440.0, 494.0, 523.0, 587.0];

const SILENT: f32 = 0.0001;

fn bass_note(sample_rate: f32, frequency: f32) -> Tone {
    let duration = BEAT_SECONDS * 0.9;
    let gain = Envelope::new(SILENT)
        .set_value_at_time(SILENT, 0.0)
        .linear_ramp_to_value_at_time(BASS_GAIN, 0.05)
        .linear_ramp_to_value_at_time(SILENT, duration);
    Tone::new(Oscillator::new(sample_rate, frequency), gain, duration)
}

fn lead_stab(sample_rate: f32, frequency: f32) -> Tone {
    let gain = Envelope::new(SILENT)
        .set_value_at_time(SILENT, 0.0)
        .linear_ramp_to_value_at_time(0.12, 0.05)
        .linear_ramp_to_value_at_time(0.08, BEAT_SECONDS * 0.8)
        .linear_ramp_to_value_at_time(SILENT, BEAT_SECONDS);
    let oscillator = Oscillator::new(sample_rate, frequency).with_waveform(Waveform::Triangle);
    Tone::new(oscillator, gain, BEAT_SECONDS)
}

/// Build the full 16-bar loop. `seed` varies the snare noise.
pub fn celebration_score(sample_rate: f32, seed: u64) -> Score {
    let mut score = Score::new();

    for bar in 0..BARS {
        let bar_time = bar as f32 * BAR_SECONDS;

        // Kick on 1 and 3, plus a syncopated ghost on even bars
        score.add(bar_time, Kick::new(sample_rate));
        score.add(bar_time + BEAT_SECONDS * 2.0, Kick::new(sample_rate));
        if bar % 2 == 0 {
            score.add(
                bar_time + BEAT_SECONDS * 3.5,
                Kick::with_config(sample_rate, KickConfig::ghost()),
            );
        }

        // Snare on 2 and 4
        let snare_seed = seed.wrapping_add(bar as u64 * 2);
        score.add(bar_time + BEAT_SECONDS, Snare::new(sample_rate, snare_seed));
        score.add(bar_time + BEAT_SECONDS * 3.0, Snare::new(sample_rate, snare_seed + 1));

        for (beat, frequency) in BASS_PATTERN.iter().enumerate() {
            score.add(bar_time + beat as f32 * BEAT_SECONDS, bass_note(sample_rate, *frequency));
        }

        if bar % 2 == 0 {
            score.add(bar_time, lead_stab(sample_rate, LEAD_PATTERN[bar % 4]));
        }
    }

    score
}

struct RunningTrack {
    context: AudioContext,
    started: Duration,
}

/// Single shared handle on the celebration loop: empty when idle
#[derive(Default)]
pub struct CelebrationTrack {
    running: Option<RunningTrack>,
}

impl CelebrationTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.running.is_some()
    }

    /// Start the loop unless one is already playing. Returns whether a new
    /// loop was started; failures are logged and leave the handle empty.
    pub fn start(&mut self, system: &mut AudioSystem, now: Duration, seed: u64) -> bool {
        if self.running.is_some() {
            log::debug!("Celebration loop already playing");
            return false;
        }

        let mut context = match system.create_context() {
            Ok(context) => context,
            Err(err) => {
                log::warn!("Celebration loop unavailable: {}", err);
                return false;
            }
        };
        if let Err(err) = system.resume_context(&mut context) {
            log::warn!("Audio context could not be resumed: {}", err);
        }

        match context.schedule(celebration_score(system.engine().sample_rate(), seed)) {
            Ok(seconds) => {
                log::info!("Celebration loop started ({:.1}s)", seconds);
                self.running = Some(RunningTrack { context, started: now });
                true
            }
            Err(err) => {
                log::warn!("Celebration loop failed: {}", err);
                false
            }
        }
    }

    /// Release the handle once the loop's lifetime has passed
    pub fn poll(&mut self, now: Duration) {
        let expired = self
            .running
            .as_ref()
            .map(|track| now.saturating_sub(track.started) >= TRACK_LIFETIME)
            .unwrap_or(false);
        if expired {
            if let Some(mut track) = self.running.take() {
                track.context.close();
                log::debug!("Celebration loop released");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_fits_in_lifetime() {
        let score = celebration_score(8000.0, 7);
        assert!(score.duration() <= TRACK_LIFETIME.as_secs_f32());
        // Last bass note of the last bar ends it
        assert!((score.duration() - (15.0 * BAR_SECONDS + BEAT_SECONDS * 3.9)).abs() < 1e-3);
    }

    #[test]
    fn test_voice_counts() {
        // 2 kicks + 2 snares + 4 bass per bar, a ghost kick and a lead on even bars
        let score = celebration_score(8000.0, 0);
        assert_eq!(score.len(), BARS * 8 + (BARS / 2) * 2);
    }
}
