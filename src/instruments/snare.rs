use super::Voice;
use crate::envelope::Envelope;
use crate::gen::oscillator::Oscillator;
use crate::gen::waveform::Waveform;

#[derive(Clone, Copy, Debug)]
pub struct SnareConfig {
    pub decay_time: f32, // Length of the noise burst in seconds
    pub tightness: f32,  // Fraction of the burst the noise takes to fall by 1/e
    pub volume: f32,     // Peak gain (0.0-1.0)
}

impl SnareConfig {
    pub fn new(decay_time: f32, tightness: f32, volume: f32) -> Self {
        Self {
            decay_time: decay_time.clamp(0.01, 2.0),
            tightness: tightness.clamp(0.01, 1.0),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn default() -> Self {
        Self::new(0.08, 0.1, 0.12)
    }
}

/// Exponentially decaying white noise burst
pub struct Snare {
    pub config: SnareConfig,
    noise: Oscillator,
    gain: Envelope,
}

impl Snare {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        Self::with_config(sample_rate, seed, SnareConfig::default())
    }

    pub fn with_config(sample_rate: f32, seed: u64, config: SnareConfig) -> Self {
        let noise = Oscillator::new(sample_rate, 0.0)
            .with_waveform(Waveform::Noise)
            .with_noise_seed(seed);
        let gain = Envelope::new(config.volume)
            .set_value_at_time(config.volume, 0.0)
            .linear_ramp_to_value_at_time(0.0001, config.decay_time);

        Self { config, noise, gain }
    }
}

impl Voice for Snare {
    fn sample(&self, elapsed: f32) -> f32 {
        if elapsed < 0.0 || elapsed >= self.config.decay_time {
            return 0.0;
        }
        let decay = (-elapsed / (self.config.decay_time * self.config.tightness)).exp();
        self.noise.value_at(elapsed) * decay * self.gain.value_at(elapsed)
    }

    fn duration(&self) -> f32 {
        self.config.decay_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snare_is_bounded_by_volume() {
        let snare = Snare::new(44100.0, 3);
        for i in 0..3528 {
            assert!(snare.sample(i as f32 / 44100.0).abs() <= 0.12 + 1e-6);
        }
    }
}
