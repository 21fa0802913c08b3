//! Timers for the main loop: a fixed-interval ticker and one-shot deferred
//! actions. Both are polled with the current monotonic time.

use std::time::Duration;

/// Fixed-interval due check. The first poll is always due.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Duration>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a tick is due at `now`; schedules the following one
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next {
            Some(next) if now < next => false,
            Some(next) => {
                // Skip missed ticks instead of firing them back to back
                let mut following = next + self.interval;
                while following <= now {
                    following += self.interval;
                }
                self.next = Some(following);
                true
            }
            None => {
                self.next = Some(now + self.interval);
                true
            }
        }
    }
}

/// One-shot actions due at a given time
#[derive(Debug)]
pub struct Timeline<A> {
    entries: Vec<(Duration, A)>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `at` has been reached. Equal times keep insertion order.
    pub fn schedule(&mut self, at: Duration, action: A) {
        let position = self
            .entries
            .iter()
            .position(|(due, _)| *due > at)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, (at, action));
    }

    /// Remove and return every action due at `now`, earliest first
    pub fn drain_due(&mut self, now: Duration) -> Vec<A> {
        let split = self
            .entries
            .iter()
            .position(|(due, _)| *due > now)
            .unwrap_or(self.entries.len());
        self.entries.drain(..split).map(|(_, action)| action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_is_due() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        assert!(ticker.poll(Duration::from_millis(5)));
        assert!(!ticker.poll(Duration::from_millis(900)));
        assert!(ticker.poll(Duration::from_millis(1005)));
    }

    #[test]
    fn test_missed_ticks_collapse() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        ticker.poll(Duration::ZERO);
        assert!(ticker.poll(Duration::from_millis(4500)));
        assert!(!ticker.poll(Duration::from_millis(4600)));
        assert!(ticker.poll(Duration::from_secs(5)));
    }

    #[test]
    fn test_timeline_drains_in_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(500), "b");
        timeline.schedule(Duration::from_millis(300), "a");
        timeline.schedule(Duration::from_millis(900), "c");

        assert!(timeline.drain_due(Duration::from_millis(200)).is_empty());
        assert_eq!(timeline.drain_due(Duration::from_millis(500)), vec!["a", "b"]);
        assert_eq!(timeline.len(), 1);
    }
}
