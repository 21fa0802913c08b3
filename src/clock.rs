use chrono::NaiveDateTime;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// One reading of the clock.
///
/// `wall` drives the countdown; `elapsed` is monotonic time since the clock
/// was created and drives every animation and deferred action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub wall: NaiveDateTime,
    pub elapsed: Duration,
}

pub trait Clock {
    fn now(&self) -> Moment;
}

/// Local wall time plus a monotonic counter
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Moment {
        Moment {
            wall: chrono::Local::now().naive_local(),
            elapsed: self.origin.elapsed(),
        }
    }
}

/// Hand-driven clock for tests. Clones share the same reading.
#[derive(Clone)]
pub struct ManualClock {
    moment: Rc<Cell<Moment>>,
}

impl ManualClock {
    pub fn new(wall: NaiveDateTime) -> Self {
        Self {
            moment: Rc::new(Cell::new(Moment {
                wall,
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Move both wall and monotonic time forward
    pub fn advance(&self, by: Duration) {
        let mut moment = self.moment.get();
        moment.elapsed += by;
        if let Ok(delta) = chrono::Duration::from_std(by) {
            moment.wall += delta;
        }
        self.moment.set(moment);
    }

    /// Jump the wall clock; monotonic time is untouched
    pub fn set_wall(&self, wall: NaiveDateTime) {
        let mut moment = self.moment.get();
        moment.wall = wall;
        self.moment.set(moment);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Moment {
        self.moment.get()
    }
}
