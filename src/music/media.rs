use crate::error::AudioError;
use std::path::Path;

/// A decoded song, downmixed to mono
#[derive(Debug, Clone)]
pub struct MediaClip {
    pub samples: Vec<f32>,
    pub sample_rate: f32,
}

impl MediaClip {
    pub fn from_samples(samples: Vec<f32>, sample_rate: f32) -> Self {
        Self {
            samples,
            sample_rate: sample_rate.max(1.0),
        }
    }

    /// Decode a WAV file
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        if !path.exists() {
            return Err(AudioError::SongMissing(path.to_path_buf()));
        }

        let decode_err = |source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(decode_err)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(decode_err)?
            }
        };

        // Average all channels of each frame
        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        log::info!(
            "Loaded {} ({} Hz, {} channel(s))",
            path.display(),
            spec.sample_rate,
            channels
        );
        Ok(Self::from_samples(samples, spec.sample_rate as f32))
    }

    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate
    }

    /// Linearly interpolated sample at a fractional position
    pub fn sample_at(&self, position: f64) -> f32 {
        if position < 0.0 {
            return 0.0;
        }
        let index = position.floor() as usize;
        let Some(&current) = self.samples.get(index) else {
            return 0.0;
        };
        let next = self.samples.get(index + 1).copied().unwrap_or(0.0);
        let frac = (position - index as f64) as f32;
        current + (next - current) * frac
    }
}
