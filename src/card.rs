//! The card's own widgets: the cake, the love letter and the notice toasts.

use std::time::Duration;

pub const LOCKED_MESSAGE: &str = "⏳ The surprise unlocks at midnight!";
pub const LOCK_BANNER: &str = "Opens at midnight 💫";
pub const CAKE_INSTRUCTION: &str = "Click the cake to blow out the candles! 🎂";
pub const WISH_MESSAGE: &str = "🎊 Your wish will come true! 🎊";

const FLAME_STAGGER: Duration = Duration::from_millis(200);
const FLAME_FADE: Duration = Duration::from_millis(500);
const LETTER_FADE: Duration = Duration::from_millis(500);
const TOAST_VISIBLE: Duration = Duration::from_millis(3000);
const TOAST_FADE: Duration = Duration::from_millis(500);

fn progress(since: Duration, now: Duration, span: Duration) -> f32 {
    (now.saturating_sub(since).as_secs_f32() / span.as_secs_f32()).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flame {
    Lit,
    /// Blowing out, 0.0 just started to 1.0 gone
    Fading(f32),
    Out,
}

#[derive(Debug, Clone)]
pub struct Cake {
    candles: usize,
    blown_at: Option<Duration>,
}

impl Cake {
    pub fn new(candles: usize) -> Self {
        Self { candles, blown_at: None }
    }

    pub fn candles(&self) -> usize {
        self.candles
    }

    pub fn is_blown_out(&self) -> bool {
        self.blown_at.is_some()
    }

    /// Blow the candles out one after another. A second blow does nothing.
    pub fn blow_out(&mut self, now: Duration) -> bool {
        if self.blown_at.is_some() {
            return false;
        }
        self.blown_at = Some(now);
        true
    }

    pub fn flame(&self, index: usize, now: Duration) -> Flame {
        let Some(blown_at) = self.blown_at else {
            return Flame::Lit;
        };
        let starts = blown_at + FLAME_STAGGER * index as u32;
        if now < starts {
            Flame::Lit
        } else if now >= starts + FLAME_FADE {
            Flame::Out
        } else {
            Flame::Fading(progress(starts, now, FLAME_FADE))
        }
    }

    pub fn flames(&self, now: Duration) -> Vec<Flame> {
        (0..self.candles).map(|i| self.flame(i, now)).collect()
    }

    pub fn instruction(&self) -> &'static str {
        if self.is_blown_out() {
            WISH_MESSAGE
        } else {
            CAKE_INSTRUCTION
        }
    }
}

/// The love letter overlay
#[derive(Debug, Clone, Default)]
pub struct Letter {
    visible: bool,
    hiding_since: Option<Duration>,
}

impl Letter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hiding(&self) -> bool {
        self.hiding_since.is_some()
    }

    /// Show the letter, cancelling a fade-out in progress
    pub fn show(&mut self) {
        self.visible = true;
        self.hiding_since = None;
    }

    /// Start fading out; hiding a hidden or fading letter is a no-op
    pub fn hide(&mut self, now: Duration) -> bool {
        if !self.visible || self.hiding_since.is_some() {
            return false;
        }
        self.hiding_since = Some(now);
        true
    }

    pub fn update(&mut self, now: Duration) {
        if let Some(since) = self.hiding_since {
            if now.saturating_sub(since) >= LETTER_FADE {
                self.visible = false;
                self.hiding_since = None;
            }
        }
    }

    pub fn opacity(&self, now: Duration) -> f32 {
        match (self.visible, self.hiding_since) {
            (false, _) => 0.0,
            (true, None) => 1.0,
            (true, Some(since)) => 1.0 - progress(since, now, LETTER_FADE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub shown_at: Duration,
}

/// Short-lived centered messages
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, now: Duration) {
        let text = text.into();
        log::debug!("Toast: {}", text);
        self.items.push(Toast { text, shown_at: now });
    }

    /// Drop toasts whose fade has finished
    pub fn update(&mut self, now: Duration) {
        self.items
            .retain(|toast| now.saturating_sub(toast.shown_at) < TOAST_VISIBLE + TOAST_FADE);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }

    /// Current toasts with their opacity
    pub fn visible(&self, now: Duration) -> Vec<(String, f32)> {
        self.items
            .iter()
            .map(|toast| {
                let fade_start = toast.shown_at + TOAST_VISIBLE;
                let opacity = if now < fade_start {
                    1.0
                } else {
                    1.0 - progress(fade_start, now, TOAST_FADE)
                };
                (toast.text.clone(), opacity)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_flames_go_out_in_turn() {
        let mut cake = Cake::new(3);
        assert!(cake.blow_out(ms(1000)));
        assert_eq!(cake.flame(0, ms(1250)), Flame::Fading(0.5));
        assert_eq!(cake.flame(1, ms(1100)), Flame::Lit);
        assert_eq!(cake.flame(2, ms(1900)), Flame::Out);
        assert_eq!(cake.instruction(), WISH_MESSAGE);

        // Blowing again does not relight or restart anything
        assert!(!cake.blow_out(ms(5000)));
        assert_eq!(cake.flame(0, ms(5000)), Flame::Out);
    }

    #[test]
    fn test_letter_fades_then_hides() {
        let mut letter = Letter::new();
        assert!(!letter.hide(ms(0)));

        letter.show();
        assert!(letter.hide(ms(100)));
        assert!(!letter.hide(ms(200)));
        letter.update(ms(400));
        assert!(letter.is_visible());
        letter.update(ms(600));
        assert!(!letter.is_visible());
    }

    #[test]
    fn test_toasts_expire_after_fade() {
        let mut toasts = Toasts::new();
        toasts.push(LOCKED_MESSAGE, ms(0));
        assert_eq!(toasts.visible(ms(3250))[0].1, 0.5);
        toasts.update(ms(3499));
        assert_eq!(toasts.len(), 1);
        toasts.update(ms(3500));
        assert!(toasts.is_empty());
    }
}
