use crate::gen::noise::white_noise;
use crate::gen::waveform::Waveform;
use std::f32::consts::PI;

/// How an oscillator's frequency evolves over the life of a voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyCurve {
    Constant(f32),
    /// Exponential sweep from `from` to `to` over `duration` seconds, then hold `to`
    Exponential { from: f32, to: f32, duration: f32 },
}

impl FrequencyCurve {
    /// Instantaneous frequency in Hz
    pub fn frequency_at(&self, elapsed: f32) -> f32 {
        match *self {
            FrequencyCurve::Constant(freq) => freq,
            FrequencyCurve::Exponential { from, to, duration } => {
                if elapsed >= duration || duration <= 0.0 {
                    to
                } else {
                    from * (to / from).powf(elapsed / duration)
                }
            }
        }
    }

    /// Accumulated phase in cycles at `elapsed` seconds.
    ///
    /// The exponential sweep is integrated in closed form so the phase stays
    /// continuous no matter how large the sample step is.
    pub fn cycles_at(&self, elapsed: f32) -> f32 {
        match *self {
            FrequencyCurve::Constant(freq) => freq * elapsed,
            FrequencyCurve::Exponential { from, to, duration } => {
                let ratio = to / from;
                let log_ratio = ratio.ln();
                if duration <= 0.0 || log_ratio.abs() < 1e-6 {
                    return from * elapsed;
                }
                let sweep_time = elapsed.min(duration);
                let sweep_cycles =
                    from * duration * (ratio.powf(sweep_time / duration) - 1.0) / log_ratio;
                let held = (elapsed - duration).max(0.0) * to;
                sweep_cycles + held
            }
        }
    }
}

/// Stateless, time-based oscillator.
///
/// The output depends only on time since the voice started, which keeps scheduled
/// voices sample accurate regardless of when the mixer picks them up.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub sample_rate: f32,
    pub waveform: Waveform,
    pub frequency: FrequencyCurve,
    pub noise_seed: u64,
}

impl Oscillator {
    pub fn new(sample_rate: f32, frequency_hz: f32) -> Self {
        Self {
            sample_rate,
            waveform: Waveform::Sine,
            frequency: FrequencyCurve::Constant(frequency_hz),
            noise_seed: 0,
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_frequency_curve(mut self, frequency: FrequencyCurve) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    fn is_multiple_of_freq_above_nyquist(&self, freq: f32, multiple: f32) -> bool {
        freq * multiple > self.sample_rate / 2.0
    }

    /// Band-limited additive waveform: odd harmonics with 1/n^exponent gain.
    /// `alternate` flips the sign of every other harmonic (triangle).
    fn generative_waveform(&self, cycles: f32, freq: f32, gain_exponent: f32, alternate: bool) -> f32 {
        let mut output = 0.0;
        let mut harmonic = 1;
        let mut sign = 1.0;
        // Cap at 20 harmonics
        while harmonic <= 39 && !self.is_multiple_of_freq_above_nyquist(freq, harmonic as f32) {
            let n = harmonic as f32;
            let gain = 1.0 / n.powf(gain_exponent);
            output += sign * gain * (2.0 * PI * cycles * n).sin();
            if alternate {
                sign = -sign;
            }
            harmonic += 2;
        }
        output
    }

    /// Generate the oscillator output `elapsed` seconds after the voice started
    pub fn value_at(&self, elapsed: f32) -> f32 {
        let cycles = self.frequency.cycles_at(elapsed);
        let freq = self.frequency.frequency_at(elapsed);

        match self.waveform {
            Waveform::Sine => (2.0 * PI * cycles.fract()).sin(),
            // Normalized so the fundamental peaks near 1.0
            Waveform::Square => self.generative_waveform(cycles.fract(), freq, 1.0, false) * (PI / 4.0),
            Waveform::Triangle => {
                self.generative_waveform(cycles.fract(), freq, 2.0, true) * (8.0 / (PI * PI))
            }
            Waveform::Noise => {
                let sample_index = (elapsed * self.sample_rate) as u64;
                white_noise(sample_index, self.noise_seed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_starts_at_zero_and_peaks_at_quarter_period() {
        let osc = Oscillator::new(44100.0, 440.0);
        assert!(osc.value_at(0.0).abs() < 1e-6);
        assert!((osc.value_at(1.0 / (4.0 * 440.0)) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_exponential_curve_reaches_target() {
        let curve = FrequencyCurve::Exponential { from: 150.0, to: 50.0, duration: 0.08 };
        assert_eq!(curve.frequency_at(0.0), 150.0);
        assert!((curve.frequency_at(0.04) - (150.0f32 * 50.0).sqrt()).abs() < 0.01);
        assert_eq!(curve.frequency_at(0.2), 50.0);
    }

    #[test]
    fn test_exponential_phase_is_continuous() {
        let curve = FrequencyCurve::Exponential { from: 150.0, to: 50.0, duration: 0.08 };
        let step = 1.0 / 44100.0;
        let mut previous = curve.cycles_at(0.0);
        let mut t = step;
        while t < 0.12 {
            let cycles = curve.cycles_at(t);
            let delta = cycles - previous;
            assert!(delta > 0.0 && delta < 150.0 * step * 1.01);
            previous = cycles;
            t += step;
        }
    }

    #[test]
    fn test_triangle_stays_in_range() {
        let osc = Oscillator::new(44100.0, 523.0).with_waveform(Waveform::Triangle);
        for i in 0..2000 {
            let v = osc.value_at(i as f32 / 44100.0);
            assert!(v.abs() <= 1.05, "triangle sample {} out of range", v);
        }
    }
}
