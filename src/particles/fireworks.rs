use super::{between, pick, progress, Effect, Rgb, Sprite, Viewport, PARTY_COLORS};
use std::f32::consts::TAU;
use std::time::Duration;

pub const BURSTS: usize = 5;
pub const SPARKS_PER_BURST: usize = 30;

const BURST_SPACING: Duration = Duration::from_millis(500);
const SPARK_LIFETIME: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Spark {
    pub origin: (f32, f32),
    /// Offset reached at the end of the spark's life
    pub travel: (f32, f32),
    pub color: Rgb,
    pub born: Duration,
}

impl Spark {
    pub fn position(&self, now: Duration) -> (f32, f32) {
        let t = progress(self.born, now, SPARK_LIFETIME);
        // Ease out: fast at first, settling at the end
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        (
            self.origin.0 + self.travel.0 * eased,
            self.origin.1 + self.travel.1 * eased,
        )
    }
}

/// Staggered radial bursts
pub struct Fireworks {
    pending: Vec<Duration>,
    sparks: Vec<Spark>,
    rng: fastrand::Rng,
}

impl Fireworks {
    pub fn new(seed: u64) -> Self {
        Self {
            pending: Vec::new(),
            sparks: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Queue a show of bursts spaced half a second apart, the first right away
    pub fn trigger(&mut self, now: Duration) {
        self.pending
            .extend((0..BURSTS).map(|i| now + BURST_SPACING * i as u32));
        self.pending.sort();
    }

    pub fn pending_bursts(&self) -> usize {
        self.pending.len()
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    fn burst(&mut self, at: Duration, viewport: Viewport) {
        let rng = &mut self.rng;
        let origin = (rng.f32() * viewport.width, rng.f32() * viewport.height * 0.5);
        self.sparks.extend((0..SPARKS_PER_BURST).map(|j| {
            let angle = TAU * j as f32 / SPARKS_PER_BURST as f32;
            let distance = between(rng, 100.0, 250.0);
            Spark {
                origin,
                travel: (angle.cos() * distance, angle.sin() * distance),
                color: pick(rng, &PARTY_COLORS),
                born: at,
            }
        }));
    }
}

impl Effect for Fireworks {
    fn update(&mut self, now: Duration, viewport: Viewport) {
        // Pending is sorted, so the due bursts are a prefix
        let due = self.pending.iter().take_while(|at| **at <= now).count();
        let bursts: Vec<Duration> = self.pending.drain(..due).collect();
        for at in bursts {
            self.burst(at, viewport);
        }

        self.sparks
            .retain(|spark| now.saturating_sub(spark.born) < SPARK_LIFETIME);
    }

    fn is_active(&self) -> bool {
        !self.pending.is_empty() || !self.sparks.is_empty()
    }

    fn draw(&self, now: Duration, _viewport: Viewport, out: &mut Vec<Sprite>) {
        out.extend(self.sparks.iter().map(|spark| {
            let (x, y) = spark.position(now);
            Sprite {
                x,
                y,
                glyph: "•",
                color: spark.color,
                size: 4.0,
                opacity: 1.0 - progress(spark.born, now, SPARK_LIFETIME),
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bursts_are_staggered() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut fireworks = Fireworks::new(9);
        fireworks.trigger(Duration::ZERO);

        fireworks.update(Duration::ZERO, viewport);
        assert_eq!(fireworks.sparks().len(), SPARKS_PER_BURST);
        assert_eq!(fireworks.pending_bursts(), BURSTS - 1);

        fireworks.update(Duration::from_millis(500), viewport);
        assert_eq!(fireworks.sparks().len(), 2 * SPARKS_PER_BURST);
    }

    #[test]
    fn test_ring_covers_full_circle() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut fireworks = Fireworks::new(9);
        fireworks.trigger(Duration::ZERO);
        fireworks.update(Duration::ZERO, viewport);

        let sparks = fireworks.sparks();
        assert!(sparks[0].origin.1 < 300.0);
        // First spark heads straight right, the 8th roughly straight down
        assert!(sparks[0].travel.1.abs() < 1e-3);
        assert!(sparks[0].travel.0 >= 100.0);
        let quarter = &sparks[SPARKS_PER_BURST / 4];
        assert!(quarter.travel.1 > 90.0);
        for spark in sparks {
            let distance = (spark.travel.0.powi(2) + spark.travel.1.powi(2)).sqrt();
            assert!((99.9..250.1).contains(&distance));
        }
    }

    #[test]
    fn test_sparks_expire_after_a_second() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut fireworks = Fireworks::new(9);
        fireworks.trigger(Duration::ZERO);
        fireworks.update(Duration::from_millis(999), viewport);
        fireworks.update(Duration::from_millis(2500), viewport);
        assert_eq!(fireworks.pending_bursts(), 0);
        assert!(fireworks.is_active());
        fireworks.update(Duration::from_millis(3000), viewport);
        assert!(!fireworks.is_active());
    }
}
