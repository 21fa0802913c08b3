use crate::input::Key;
use std::time::Duration;

/// Horizontal travel a swipe needs before it navigates, in pixels
pub const SWIPE_THRESHOLD: f32 = 40.0;

const CLOSE_FADE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxItem {
    pub src: String,
    pub alt: String,
}

/// Full-screen viewer over a fixed list of photos
#[derive(Debug, Clone)]
pub struct Lightbox {
    items: Vec<LightboxItem>,
    current: usize,
    listening: bool,
    closing_since: Option<Duration>,
    closed: bool,
    touch_start: Option<f32>,
}

impl Lightbox {
    /// Open on `start`; `None` when there is nothing to show
    pub fn open(items: Vec<LightboxItem>, start: usize) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let mut lightbox = Self {
            items,
            current: 0,
            listening: true,
            closing_since: None,
            closed: false,
            touch_start: None,
        };
        lightbox.show(start as isize);
        Some(lightbox)
    }

    /// Show `index`, wrapping below zero to the last photo and past the end to
    /// the first
    pub fn show(&mut self, index: isize) {
        let len = self.items.len() as isize;
        let index = if index < 0 {
            len - 1
        } else if index >= len {
            0
        } else {
            index
        };
        self.current = index as usize;
    }

    pub fn next(&mut self) {
        self.show(self.current as isize + 1);
    }

    pub fn prev(&mut self) {
        self.show(self.current as isize - 1);
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> &LightboxItem {
        &self.items[self.current]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the key listener is still attached
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_closing(&self) -> bool {
        self.closing_since.is_some()
    }

    /// Gone once the close fade has finished
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true when the key was used
    pub fn handle_key(&mut self, key: &Key, now: Duration) -> bool {
        if !self.listening {
            return false;
        }
        match key {
            Key::Escape => self.close(now),
            Key::Left => self.prev(),
            Key::Right => self.next(),
            _ => return false,
        }
        true
    }

    /// Touch listeners detach with the key listener
    pub fn touch_start(&mut self, x: f32) -> bool {
        if !self.listening {
            return false;
        }
        self.touch_start = Some(x);
        true
    }

    pub fn touch_end(&mut self, x: f32) -> bool {
        if !self.listening {
            return false;
        }
        let Some(start) = self.touch_start.take() else {
            return false;
        };
        let dx = x - start;
        if dx.abs() > SWIPE_THRESHOLD {
            if dx > 0.0 {
                self.prev();
            } else {
                self.next();
            }
        }
        true
    }

    /// Fade out; the key listener is detached right away
    pub fn close(&mut self, now: Duration) {
        if self.closing_since.is_some() || self.closed {
            return;
        }
        self.listening = false;
        self.touch_start = None;
        self.closing_since = Some(now);
    }

    pub fn update(&mut self, now: Duration) {
        if let Some(since) = self.closing_since {
            if now.saturating_sub(since) >= CLOSE_FADE {
                self.closed = true;
            }
        }
    }

    pub fn opacity(&self, now: Duration) -> f32 {
        match self.closing_since {
            _ if self.closed => 0.0,
            None => 1.0,
            Some(since) => 1.0 - (now.saturating_sub(since).as_secs_f32() / CLOSE_FADE.as_secs_f32()).min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<LightboxItem> {
        (0..n)
            .map(|i| LightboxItem {
                src: format!("photo{}.jpg", i),
                alt: format!("Photo {}", i),
            })
            .collect()
    }

    #[test]
    fn test_open_on_empty_list_is_none() {
        assert!(Lightbox::open(Vec::new(), 0).is_none());
    }

    #[test]
    fn test_out_of_range_start_wraps_to_first() {
        let lightbox = Lightbox::open(items(3), 7).unwrap();
        assert_eq!(lightbox.current(), 0);
    }

    #[test]
    fn test_closing_lightbox_ignores_swipes() {
        let mut lightbox = Lightbox::open(items(3), 1).unwrap();
        assert!(lightbox.touch_start(300.0));
        lightbox.close(Duration::ZERO);

        assert!(!lightbox.touch_end(200.0));
        assert!(!lightbox.touch_start(300.0));
        assert!(!lightbox.touch_end(200.0));
        assert_eq!(lightbox.current(), 1);
    }

    #[test]
    fn test_swipe_below_threshold_is_ignored() {
        let mut lightbox = Lightbox::open(items(3), 1).unwrap();
        lightbox.touch_start(100.0);
        lightbox.touch_end(140.0);
        assert_eq!(lightbox.current(), 1);

        lightbox.touch_start(100.0);
        lightbox.touch_end(141.0);
        assert_eq!(lightbox.current(), 0);
    }
}
