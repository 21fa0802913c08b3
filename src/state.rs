//! Application state owned by the controller.
//!
//! The one-shot transitions live behind methods so they cannot be replayed:
//! the lock only ever opens once and the celebration latch only ever fires once.

use crate::countdown::Remaining;

/// Whether gated features are withheld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lock {
    /// The card has not been opened yet
    #[default]
    Pending,
    Locked,
    Unlocked,
}

impl Lock {
    /// Lock the card; only a card that was never unlocked can be locked
    pub fn engage(&mut self) -> bool {
        if *self == Lock::Pending {
            *self = Lock::Locked;
            true
        } else {
            false
        }
    }

    /// Open the card for good
    pub fn release(&mut self) -> bool {
        let changed = *self != Lock::Unlocked;
        *self = Lock::Unlocked;
        changed
    }

    pub fn is_locked(&self) -> bool {
        *self == Lock::Locked
    }

    pub fn is_unlocked(&self) -> bool {
        *self == Lock::Unlocked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    /// Welcome screen fading out
    Opening,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    NotStarted,
    Playing,
    Paused,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub screen: Screen,
    lock: Lock,
    celebrated: bool,
    celebrations: u32,
    start_enabled: bool,
    countdown: Option<Remaining>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> Lock {
        self.lock
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn engage_lock(&mut self) -> bool {
        self.lock.engage()
    }

    pub fn release_lock(&mut self) -> bool {
        self.lock.release()
    }

    /// Set the celebration latch. True only for the first caller.
    pub fn try_mark_celebrated(&mut self) -> bool {
        if self.celebrated {
            return false;
        }
        self.celebrated = true;
        true
    }

    pub fn has_celebrated(&self) -> bool {
        self.celebrated
    }

    /// Count one run of the celebration sequence
    pub fn record_celebration(&mut self) {
        self.celebrations += 1;
    }

    pub fn celebrations(&self) -> u32 {
        self.celebrations
    }

    pub fn enable_start(&mut self) {
        self.start_enabled = true;
    }

    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    pub fn set_countdown(&mut self, remaining: Remaining) {
        self.countdown = Some(remaining);
    }

    pub fn countdown(&self) -> Option<Remaining> {
        self.countdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_only_engages_from_pending() {
        let mut lock = Lock::default();
        assert!(lock.engage());
        assert!(lock.is_locked());
        assert!(lock.release());
        assert!(!lock.engage());
        assert!(lock.is_unlocked());
        assert!(!lock.release());
    }

    #[test]
    fn test_celebration_latch_fires_once() {
        let mut state = AppState::new();
        assert!(state.try_mark_celebrated());
        assert!(!state.try_mark_celebrated());
        assert!(state.has_celebrated());
    }
}
