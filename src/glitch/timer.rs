//! Cooperative timers polled from the frame loop against a caller-supplied
//! clock (time since the session started). Nothing here sleeps or spawns.

use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Duration,
    cancelled: bool,
}

impl Interval {
    pub fn new(period: Duration, now: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            period,
            next: now + period,
            cancelled: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// True once per elapsed period. After a stall the missed ticks are
    /// dropped and the schedule restarts from `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.cancelled || now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// One-shot deadline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Duration>,
}

impl Timeout {
    /// Arms the timeout; an already pending earlier deadline wins.
    pub fn arm(&mut self, at: Duration) {
        self.deadline = Some(match self.deadline {
            Some(pending) => pending.min(at),
            None => at,
        });
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fires at most once per arming.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
