use chrono::NaiveDateTime;
use std::fmt;

/// Shown in place of the countdown once the target instant has passed
pub const ARRIVED_MESSAGE: &str = "🎉 IT'S YOUR BIRTHDAY! 🎉";

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    /// Floor-divide a positive millisecond difference
    pub fn from_millis(diff: i64) -> Self {
        Self {
            days: diff / MS_PER_DAY,
            hours: (diff % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (diff % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (diff % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days {} hours {} minutes {} seconds",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Pending(TimeLeft),
    Arrived,
}

/// Counts down to a fixed target instant, read-only once built
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    target: NaiveDateTime,
}

impl Countdown {
    pub fn new(target: NaiveDateTime) -> Self {
        Self { target }
    }

    pub fn target(&self) -> NaiveDateTime {
        self.target
    }

    pub fn has_arrived(&self, now: NaiveDateTime) -> bool {
        now >= self.target
    }

    pub fn remaining(&self, now: NaiveDateTime) -> Remaining {
        let diff = (self.target - now).num_milliseconds();
        if diff <= 0 {
            Remaining::Arrived
        } else {
            Remaining::Pending(TimeLeft::from_millis(diff))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_ten_seconds_before_midnight() {
        let countdown = Countdown::new(at(17, 0, 0, 0));
        assert_eq!(
            countdown.remaining(at(16, 23, 59, 50)),
            Remaining::Pending(TimeLeft {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 10
            })
        );
    }

    #[test]
    fn test_partial_seconds_round_down() {
        let countdown = Countdown::new(at(17, 0, 0, 0));
        let now = at(14, 21, 30, 15) + chrono::Duration::milliseconds(400);
        assert_eq!(
            countdown.remaining(now),
            Remaining::Pending(TimeLeft {
                days: 2,
                hours: 2,
                minutes: 29,
                seconds: 44
            })
        );
    }

    #[test]
    fn test_arrived_at_and_after_target() {
        let countdown = Countdown::new(at(17, 0, 0, 0));
        assert_eq!(countdown.remaining(at(17, 0, 0, 0)), Remaining::Arrived);
        assert_eq!(countdown.remaining(at(18, 8, 0, 0)), Remaining::Arrived);
    }
}
