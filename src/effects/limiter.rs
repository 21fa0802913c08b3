use super::Effect;

/// A brick wall limiter that prevents audio signals from exceeding a threshold
pub struct BrickWallLimiter {
    pub threshold: f32,
}

impl BrickWallLimiter {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }
}

impl Effect for BrickWallLimiter {
    /// Apply brick wall limiting to the input signal
    fn process(&self, input: f32) -> f32 {
        input.clamp(-self.threshold, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_both_polarities() {
        let limiter = BrickWallLimiter::new(0.9);
        assert_eq!(limiter.process(1.5), 0.9);
        assert_eq!(limiter.process(-2.0), -0.9);
        assert_eq!(limiter.process(0.25), 0.25);
    }
}
