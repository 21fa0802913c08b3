use super::Voice;
use crate::envelope::Envelope;
use crate::gen::oscillator::Oscillator;
use crate::gen::waveform::Waveform;

/// Attack and release of a melody note, long enough to avoid clicks
pub const NOTE_RAMP_SECONDS: f32 = 0.01;

/// An oscillator shaped by a gain envelope
pub struct Tone {
    pub oscillator: Oscillator,
    pub gain: Envelope,
    duration: f32,
}

impl Tone {
    pub fn new(oscillator: Oscillator, gain: Envelope, duration: f32) -> Self {
        Self {
            oscillator,
            gain,
            duration: duration.max(0.0),
        }
    }

    /// Plain note with a short linear attack and release
    pub fn note(sample_rate: f32, frequency_hz: f32, duration: f32, peak: f32) -> Self {
        let oscillator = Oscillator::new(sample_rate, frequency_hz).with_waveform(Waveform::Sine);
        let gain = Envelope::attack_release(peak, NOTE_RAMP_SECONDS, NOTE_RAMP_SECONDS, duration);
        Self::new(oscillator, gain, duration)
    }
}

impl Voice for Tone {
    fn sample(&self, elapsed: f32) -> f32 {
        if elapsed < 0.0 || elapsed >= self.duration {
            return 0.0;
        }
        self.oscillator.value_at(elapsed) * self.gain.value_at(elapsed)
    }

    fn duration(&self) -> f32 {
        self.duration
    }
}
