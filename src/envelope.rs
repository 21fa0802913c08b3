/// A single automation event on a gain (or any other) parameter
#[derive(Clone, Copy, Debug, PartialEq)]
enum Automation {
    /// Jump to `value` at `time`
    SetValue { time: f32, value: f32 },
    /// Ramp linearly from the previous event to `value`, arriving at `time`
    LinearRamp { time: f32, value: f32 },
}

impl Automation {
    fn time(&self) -> f32 {
        match *self {
            Automation::SetValue { time, .. } | Automation::LinearRamp { time, .. } => time,
        }
    }

    fn value(&self) -> f32 {
        match *self {
            Automation::SetValue { value, .. } | Automation::LinearRamp { value, .. } => value,
        }
    }
}

/// Breakpoint envelope that follows Web Audio parameter automation rules.
///
/// Times are seconds relative to the start of the voice that owns the envelope.
/// Before the first event the envelope holds `default_value`; after the last
/// event it holds the last value.
#[derive(Clone, Debug)]
pub struct Envelope {
    default_value: f32,
    events: Vec<Automation>,
}

impl Envelope {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::new(),
        }
    }

    /// Linear attack / hold / release shape used for click-free tones.
    ///
    /// Rises from silence to `peak` over `attack`, holds, and falls back to
    /// silence over the final `release` seconds of `duration`.
    pub fn attack_release(peak: f32, attack: f32, release: f32, duration: f32) -> Self {
        let attack = attack.max(0.0).min(duration * 0.5);
        let release = release.max(0.0).min(duration * 0.5);
        Self::new(0.0)
            .set_value_at_time(0.0, 0.0)
            .linear_ramp_to_value_at_time(peak, attack)
            .linear_ramp_to_value_at_time(peak, duration - release)
            .linear_ramp_to_value_at_time(0.0, duration)
    }

    pub fn set_value_at_time(mut self, value: f32, time: f32) -> Self {
        self.insert(Automation::SetValue { time, value });
        self
    }

    pub fn linear_ramp_to_value_at_time(mut self, value: f32, time: f32) -> Self {
        self.insert(Automation::LinearRamp { time, value });
        self
    }

    fn insert(&mut self, event: Automation) {
        // Events with equal times keep insertion order
        let position = self
            .events
            .iter()
            .position(|existing| existing.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(position, event);
    }

    /// Get the envelope value at `time` seconds
    pub fn value_at(&self, time: f32) -> f32 {
        let mut previous_time = 0.0;
        let mut previous_value = self.default_value;

        for event in &self.events {
            if time < event.time() {
                return match *event {
                    Automation::SetValue { .. } => previous_value,
                    Automation::LinearRamp { time: end, value } => {
                        let span = end - previous_time;
                        if span <= f32::EPSILON {
                            value
                        } else {
                            let progress = ((time - previous_time) / span).clamp(0.0, 1.0);
                            previous_value + (value - previous_value) * progress
                        }
                    }
                };
            }
            previous_time = event.time();
            previous_value = event.value();
        }

        previous_value
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(1.0)
    }
}
