//! Declaratively animated decorations.
//!
//! Unlike confetti these are not stepped per frame: each item is a start time,
//! a motion and a removal deadline, and its position is a pure function of the
//! current time.

use super::{
    between, pick, progress, Effect, IntervalSpawner, Rgb, Sprite, Viewport, EXPLOSION_GLYPHS, HEART_GLYPHS,
};
use std::f32::consts::TAU;
use std::time::Duration;

const HEART_INTERVAL: Duration = Duration::from_millis(300);
const HEART_LIFETIME: Duration = Duration::from_millis(8000);
const HEART_COLOR: Rgb = (0xf5, 0x57, 0x6c);

const BALLOON_INTERVAL: Duration = Duration::from_millis(1500);
const BALLOON_INITIAL_BURST: usize = 6;
const BALLOON_COLORS: [Rgb; 6] = [
    (0xff, 0x6b, 0x6b),
    (0xf0, 0x93, 0xfb),
    (0xf9, 0xca, 0x24),
    (0x6c, 0x5c, 0xe7),
    (0x4e, 0xcd, 0xc4),
    (0xfd, 0x79, 0xa8),
];
const BALLOON_SWAY_PX: f32 = 12.0;

const SPARKLE_RISE_PX: f32 = 50.0;
const SPARKLE_LIFETIME: Duration = Duration::from_millis(1000);
const SPARKLE_COLOR: Rgb = (0xf9, 0xca, 0x24);

pub const EXPLOSION_HEARTS: usize = 50;
const EXPLOSION_STAGGER: Duration = Duration::from_millis(20);
const EXPLOSION_LIFETIME: Duration = Duration::from_millis(4000);

fn secs(low: f32, high: f32, rng: &mut fastrand::Rng) -> Duration {
    Duration::from_secs_f32(between(rng, low, high))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Float up from below the bottom edge, `left` is a fraction of the width
    Rise {
        left: f32,
        duration: Duration,
        delay: Duration,
        sway: Option<Duration>,
    },
    /// Drift straight up from a fixed point
    Lift { x: f32, y: f32 },
    /// Fly out from the viewport center by `offset`
    Burst { offset: (f32, f32), duration: Duration },
}

#[derive(Debug, Clone)]
pub struct Floater {
    pub glyph: &'static str,
    pub color: Rgb,
    pub size: f32,
    pub spawned: Duration,
    pub expires: Duration,
    pub motion: Motion,
}

impl Floater {
    fn sprite(&self, now: Duration, viewport: Viewport) -> Option<Sprite> {
        if now < self.spawned {
            return None;
        }

        let (x, y, opacity) = match &self.motion {
            Motion::Rise {
                left,
                duration,
                delay,
                sway,
            } => {
                let start = self.spawned + *delay;
                if now < start {
                    return None;
                }
                let t = progress(start, now, *duration);
                let travel = viewport.height + 2.0 * self.size;
                let mut x = left * viewport.width;
                if let Some(period) = sway {
                    let phase = now.saturating_sub(start).as_secs_f32() / period.as_secs_f32().max(0.001);
                    x += BALLOON_SWAY_PX * (phase * TAU).sin();
                }
                let opacity = if t > 0.8 { (1.0 - t) / 0.2 } else { 1.0 };
                (x, viewport.height + self.size - travel * t, opacity)
            }
            Motion::Lift { x, y } => {
                let t = progress(self.spawned, now, SPARKLE_LIFETIME);
                (*x, y - SPARKLE_RISE_PX * t, 1.0 - t)
            }
            Motion::Burst { offset, duration } => {
                let t = progress(self.spawned, now, *duration);
                let (cx, cy) = viewport.center();
                (cx + offset.0 * t, cy + offset.1 * t, 1.0 - t)
            }
        };

        Some(Sprite {
            x,
            y,
            glyph: self.glyph,
            color: self.color,
            size: self.size,
            opacity,
        })
    }
}

/// Items removed by their own deadline, the way a one-shot timer would
#[derive(Debug, Default)]
struct Floaters {
    items: Vec<Floater>,
}

impl Floaters {
    fn expire(&mut self, now: Duration) {
        self.items.retain(|item| now < item.expires);
    }

    fn draw(&self, now: Duration, viewport: Viewport, out: &mut Vec<Sprite>) {
        out.extend(self.items.iter().filter_map(|item| item.sprite(now, viewport)));
    }
}

/// Hearts drifting up the background while the card is open
pub struct FloatingHearts {
    spawner: IntervalSpawner,
    floaters: Floaters,
    rng: fastrand::Rng,
}

impl FloatingHearts {
    pub fn new(seed: u64) -> Self {
        Self {
            spawner: IntervalSpawner::new(HEART_INTERVAL),
            floaters: Floaters::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn start(&mut self, now: Duration) {
        self.spawner.start(now);
    }

    pub fn stop(&mut self) {
        self.spawner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.spawner.is_running()
    }

    pub fn len(&self) -> usize {
        self.floaters.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floaters.items.is_empty()
    }

    fn spawn(&mut self, now: Duration) {
        let rng = &mut self.rng;
        self.floaters.items.push(Floater {
            glyph: pick(rng, &HEART_GLYPHS),
            color: HEART_COLOR,
            size: between(rng, 15.0, 35.0),
            spawned: now,
            expires: now + HEART_LIFETIME,
            motion: Motion::Rise {
                left: rng.f32(),
                duration: secs(5.0, 8.0, rng),
                delay: Duration::ZERO,
                sway: None,
            },
        });
    }
}

impl Effect for FloatingHearts {
    fn update(&mut self, now: Duration, _viewport: Viewport) {
        for _ in 0..self.spawner.due(now) {
            self.spawn(now);
        }
        self.floaters.expire(now);
    }

    fn is_active(&self) -> bool {
        self.spawner.is_running() || !self.floaters.items.is_empty()
    }

    fn draw(&self, now: Duration, viewport: Viewport, out: &mut Vec<Sprite>) {
        self.floaters.draw(now, viewport, out);
    }
}

/// Balloons: an initial burst, then a steady trickle
pub struct Balloons {
    spawner: IntervalSpawner,
    floaters: Floaters,
    rng: fastrand::Rng,
}

impl Balloons {
    pub fn new(seed: u64) -> Self {
        Self {
            spawner: IntervalSpawner::new(BALLOON_INTERVAL),
            floaters: Floaters::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn start(&mut self, now: Duration) {
        if self.spawner.is_running() {
            return;
        }
        for _ in 0..BALLOON_INITIAL_BURST {
            self.spawn(now);
        }
        self.spawner.start(now);
    }

    pub fn stop(&mut self) {
        self.spawner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.spawner.is_running()
    }

    pub fn len(&self) -> usize {
        self.floaters.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floaters.items.is_empty()
    }

    fn spawn(&mut self, now: Duration) {
        let rng = &mut self.rng;
        let duration = secs(10.0, 16.0, rng);
        let delay = secs(0.0, 2.0, rng);
        self.floaters.items.push(Floater {
            glyph: "🎈",
            color: pick(rng, &BALLOON_COLORS),
            size: 40.0,
            spawned: now,
            expires: now + duration + delay,
            motion: Motion::Rise {
                left: rng.f32(),
                duration,
                delay,
                sway: Some(secs(2.0, 4.0, rng)),
            },
        });
    }
}

impl Effect for Balloons {
    fn update(&mut self, now: Duration, _viewport: Viewport) {
        for _ in 0..self.spawner.due(now) {
            self.spawn(now);
        }
        self.floaters.expire(now);
    }

    fn is_active(&self) -> bool {
        self.spawner.is_running() || !self.floaters.items.is_empty()
    }

    fn draw(&self, now: Duration, viewport: Viewport, out: &mut Vec<Sprite>) {
        self.floaters.draw(now, viewport, out);
    }
}

/// A sparkle for every click on the card
#[derive(Default)]
pub struct Sparkles {
    floaters: Floaters,
}

impl Sparkles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, x: f32, y: f32, now: Duration) {
        self.floaters.items.push(Floater {
            glyph: "✨",
            color: SPARKLE_COLOR,
            size: 20.0,
            spawned: now,
            expires: now + SPARKLE_LIFETIME,
            motion: Motion::Lift { x, y },
        });
    }

    pub fn len(&self) -> usize {
        self.floaters.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floaters.items.is_empty()
    }
}

impl Effect for Sparkles {
    fn update(&mut self, now: Duration, _viewport: Viewport) {
        self.floaters.expire(now);
    }

    fn is_active(&self) -> bool {
        !self.floaters.items.is_empty()
    }

    fn draw(&self, now: Duration, viewport: Viewport, out: &mut Vec<Sprite>) {
        self.floaters.draw(now, viewport, out);
    }
}

/// A ring of hearts bursting out of the center, one every 20 ms
pub struct HeartExplosion {
    floaters: Floaters,
    rng: fastrand::Rng,
}

impl HeartExplosion {
    pub fn new(seed: u64) -> Self {
        Self {
            floaters: Floaters::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn trigger(&mut self, now: Duration) {
        let rng = &mut self.rng;
        self.floaters.items.extend((0..EXPLOSION_HEARTS).map(|i| {
            let spawned = now + EXPLOSION_STAGGER * i as u32;
            let angle = TAU * i as f32 / EXPLOSION_HEARTS as f32;
            let distance = between(rng, 200.0, 500.0);
            Floater {
                glyph: pick(rng, &EXPLOSION_GLYPHS),
                color: HEART_COLOR,
                size: between(rng, 20.0, 50.0),
                spawned,
                expires: spawned + EXPLOSION_LIFETIME,
                motion: Motion::Burst {
                    offset: (angle.cos() * distance, angle.sin() * distance),
                    duration: secs(2.0, 4.0, rng),
                },
            }
        }));
    }

    pub fn len(&self) -> usize {
        self.floaters.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floaters.items.is_empty()
    }
}

impl Effect for HeartExplosion {
    fn update(&mut self, now: Duration, _viewport: Viewport) {
        self.floaters.expire(now);
    }

    fn is_active(&self) -> bool {
        !self.floaters.items.is_empty()
    }

    fn draw(&self, now: Duration, viewport: Viewport, out: &mut Vec<Sprite>) {
        self.floaters.draw(now, viewport, out);
    }
}
