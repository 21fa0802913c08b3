//! Front-end independent input events

use crate::particles::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Left,
    Right,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Key(Key),
    /// Pointer press, in viewport pixels
    Click { x: f32, y: f32 },
    TouchStart { x: f32 },
    TouchEnd { x: f32 },
    Resize(Viewport),
}

impl AppEvent {
    /// Key presses and clicks count as user interaction
    pub fn is_interaction(&self) -> bool {
        matches!(self, AppEvent::Key(_) | AppEvent::Click { .. })
    }
}
