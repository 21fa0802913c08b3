use std::time::Duration;

/// Spawns owed after a long stall are capped at this many
const MAX_CATCH_UP: usize = 5;

/// Repeating spawn timer with an explicit start and stop.
///
/// Like a browser interval, the first spawn is owed one interval after
/// `start`.
#[derive(Debug, Clone)]
pub struct IntervalSpawner {
    interval: Duration,
    next: Option<Duration>,
}

impl IntervalSpawner {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    pub fn start(&mut self, now: Duration) {
        if self.next.is_none() {
            self.next = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Number of spawns owed at `now`
    pub fn due(&mut self, now: Duration) -> usize {
        let Some(mut next) = self.next else {
            return 0;
        };
        if self.interval.is_zero() {
            return 0;
        }

        let mut count = 0;
        while next <= now {
            count += 1;
            next += self.interval;
        }
        self.next = Some(next);
        count.min(MAX_CATCH_UP)
    }
}
