//! Decorative effects.
//!
//! Every engine owns its particles and nothing else; none reads another's
//! state. Positions are in pixels of a virtual viewport so the numbers match
//! a browser page; the view maps them onto terminal cells.

pub mod confetti;
pub mod fireworks;
pub mod floating;
pub mod spawner;

pub use self::confetti::Confetti;
pub use self::fireworks::Fireworks;
pub use self::floating::{Balloons, FloatingHearts, HeartExplosion, Sparkles};
pub use self::spawner::IntervalSpawner;

use std::time::Duration;

pub type Rgb = (u8, u8, u8);

/// Pixels per terminal cell
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Confetti and firework colors
pub const PARTY_COLORS: [Rgb; 8] = [
    (0xff, 0x6b, 0x6b),
    (0x4e, 0xcd, 0xc4),
    (0x45, 0xb7, 0xd1),
    (0xf9, 0xca, 0x24),
    (0x6c, 0x5c, 0xe7),
    (0xa2, 0x9b, 0xfe),
    (0xfd, 0x79, 0xa8),
    (0xfd, 0xcb, 0x6e),
];

pub const HEART_GLYPHS: [&str; 6] = ["❤️", "💕", "💖", "💗", "💓", "💝"];
pub const EXPLOSION_GLYPHS: [&str; 8] = ["❤️", "💕", "💖", "💗", "💓", "💝", "💞", "💟"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Self::new(columns as f32 * CELL_WIDTH_PX, rows as f32 * CELL_HEIGHT_PX)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Terminal cell under a pixel position, if on screen
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(((x / CELL_WIDTH_PX) as u16, (y / CELL_HEIGHT_PX) as u16))
    }

    /// Pixel position at the center of a terminal cell
    pub fn from_cell(column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 + 0.5) * CELL_WIDTH_PX,
            (row as f32 + 0.5) * CELL_HEIGHT_PX,
        )
    }
}

/// One thing to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub glyph: &'static str,
    pub color: Rgb,
    pub size: f32,
    pub opacity: f32,
}

pub trait Effect {
    /// Advance by one frame
    fn update(&mut self, now: Duration, viewport: Viewport);

    /// False once the effect has nothing left to animate or spawn
    fn is_active(&self) -> bool;

    fn draw(&self, now: Duration, viewport: Viewport, out: &mut Vec<Sprite>);
}

/// Fraction of `span` elapsed between `start` and `now`, clamped to 0..=1
pub(crate) fn progress(start: Duration, now: Duration, span: Duration) -> f32 {
    if span.is_zero() {
        return 1.0;
    }
    (now.saturating_sub(start).as_secs_f32() / span.as_secs_f32()).clamp(0.0, 1.0)
}

pub(crate) fn pick<T: Copy>(rng: &mut fastrand::Rng, items: &[T]) -> T {
    items[rng.usize(0..items.len())]
}

/// Uniform float in `[low, high)`
pub(crate) fn between(rng: &mut fastrand::Rng, low: f32, high: f32) -> f32 {
    low + rng.f32() * (high - low)
}
