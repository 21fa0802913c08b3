use super::{between, pick, Effect, Rgb, Sprite, Viewport, PARTY_COLORS};
use std::time::Duration;

pub const BATCH_SIZE: usize = 150;

/// Added to the vertical velocity every frame
const GRAVITY: f32 = 0.1;

const PIECES: [&str; 4] = ["▬", "◆", "▮", "◆"];

#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    pub vx: f32,
    pub vy: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Frame-stepped confetti shower. Runs until the last piece has fallen off
/// the bottom edge.
pub struct Confetti {
    pieces: Vec<ConfettiPiece>,
    frames: u64,
    rng: fastrand::Rng,
}

impl Confetti {
    pub fn new(seed: u64) -> Self {
        Self {
            pieces: Vec::new(),
            frames: 0,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Drop a new batch from just above the top edge
    pub fn launch(&mut self, viewport: Viewport) {
        let rng = &mut self.rng;
        self.pieces.extend((0..BATCH_SIZE).map(|_| ConfettiPiece {
            x: rng.f32() * viewport.width,
            y: -10.0,
            size: between(rng, 4.0, 12.0),
            color: pick(rng, &PARTY_COLORS),
            vx: between(rng, -2.0, 2.0),
            vy: between(rng, 2.0, 5.0),
            rotation: rng.f32() * 360.0,
            rotation_speed: between(rng, -5.0, 5.0),
        }));
        log::debug!("Confetti launched, {} pieces in flight", self.pieces.len());
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Frames actually stepped so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }
}

impl Effect for Confetti {
    fn update(&mut self, _now: Duration, viewport: Viewport) {
        if self.pieces.is_empty() {
            return;
        }
        self.frames += 1;

        self.pieces.retain_mut(|piece| {
            piece.y += piece.vy;
            piece.x += piece.vx;
            piece.rotation += piece.rotation_speed;
            piece.vy += GRAVITY;
            piece.y <= viewport.height
        });
    }

    fn is_active(&self) -> bool {
        !self.pieces.is_empty()
    }

    fn draw(&self, _now: Duration, _viewport: Viewport, out: &mut Vec<Sprite>) {
        out.extend(self.pieces.iter().map(|piece| {
            let quarter = (piece.rotation.rem_euclid(360.0) / 90.0) as usize % PIECES.len();
            Sprite {
                x: piece.x,
                y: piece.y,
                glyph: PIECES[quarter],
                color: piece.color,
                size: piece.size,
                opacity: 1.0,
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_starts_above_the_top() {
        let mut confetti = Confetti::new(3);
        confetti.launch(Viewport::new(800.0, 600.0));
        assert_eq!(confetti.len(), BATCH_SIZE);
        for piece in confetti.pieces() {
            assert_eq!(piece.y, -10.0);
            assert!((0.0..800.0).contains(&piece.x));
            assert!((4.0..12.0).contains(&piece.size));
            assert!((2.0..5.0).contains(&piece.vy));
        }
    }

    #[test]
    fn test_gravity_accelerates_each_frame() {
        let mut confetti = Confetti::new(3);
        let viewport = Viewport::new(800.0, 600.0);
        confetti.launch(viewport);
        let vy = confetti.pieces()[0].vy;
        confetti.update(Duration::ZERO, viewport);
        assert!((confetti.pieces()[0].vy - (vy + GRAVITY)).abs() < 1e-5);
        assert!((confetti.pieces()[0].y - (-10.0 + vy)).abs() < 1e-4);
    }
}
