use super::Voice;
use crate::envelope::Envelope;
use crate::gen::oscillator::{FrequencyCurve, Oscillator};
use crate::gen::waveform::Waveform;

/// Static configuration for a synthesized kick
#[derive(Clone, Copy, Debug)]
pub struct KickConfig {
    pub start_frequency: f32, // Pitch at the hit (Hz)
    pub end_frequency: f32,   // Pitch the sweep settles on (Hz)
    pub decay_time: f32,      // Length of the hit in seconds
    pub volume: f32,          // Peak gain (0.0-1.0)
}

impl KickConfig {
    pub fn new(start_frequency: f32, end_frequency: f32, decay_time: f32, volume: f32) -> Self {
        Self {
            start_frequency: start_frequency.clamp(20.0, 400.0),
            end_frequency: end_frequency.clamp(20.0, 400.0),
            decay_time: decay_time.clamp(0.01, 2.0),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn default() -> Self {
        Self::new(150.0, 50.0, 0.08, 0.15)
    }

    /// Shorter ghost hit used for syncopated off-beats
    pub fn ghost() -> Self {
        Self::new(150.0, 50.0, 0.06, 0.15)
    }
}

/// Sine body with an exponential pitch drop and a linear fade
pub struct Kick {
    pub config: KickConfig,
    body: Oscillator,
    gain: Envelope,
}

impl Kick {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_config(sample_rate, KickConfig::default())
    }

    pub fn with_config(sample_rate: f32, config: KickConfig) -> Self {
        let body = Oscillator::new(sample_rate, config.start_frequency)
            .with_waveform(Waveform::Sine)
            .with_frequency_curve(FrequencyCurve::Exponential {
                from: config.start_frequency,
                to: config.end_frequency,
                duration: config.decay_time,
            });
        let gain = Envelope::new(config.volume)
            .set_value_at_time(config.volume, 0.0)
            .linear_ramp_to_value_at_time(0.0001, config.decay_time);

        Self { config, body, gain }
    }
}

impl Voice for Kick {
    fn sample(&self, elapsed: f32) -> f32 {
        if elapsed < 0.0 || elapsed >= self.config.decay_time {
            return 0.0;
        }
        self.body.value_at(elapsed) * self.gain.value_at(elapsed)
    }

    fn duration(&self) -> f32 {
        self.config.decay_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_decays() {
        let kick = Kick::new(44100.0);
        let early = (0..400).map(|i| kick.sample(i as f32 / 44100.0).abs()).fold(0.0f32, f32::max);
        let late = (3000..3500).map(|i| kick.sample(i as f32 / 44100.0).abs()).fold(0.0f32, f32::max);
        assert!(early > late);
        assert_eq!(kick.sample(0.2), 0.0);
    }
}
