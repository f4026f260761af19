//! Clocks and cancellable timed tasks.
//!
//! Nothing here spawns threads: a [`TaskHandle`] only records when it is due,
//! and whoever owns it polls it against a [`Clock`]. Dropping the handle
//! cancels the task.

use std::cell::Cell;
use std::time::{Duration, Instant};

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand, for driving timed code deterministically.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    interval: Duration,
    next_due: Duration,
    repeating: bool,
    spent: bool,
}

impl TaskHandle {
    /// First fires one `interval` after `now`, then every `interval`.
    pub fn repeating(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
            repeating: true,
            spent: false,
        }
    }

    pub fn once(delay: Duration, now: Duration) -> Self {
        Self {
            interval: delay,
            next_due: now + delay,
            repeating: false,
            spent: false,
        }
    }

    /// Consumes one due firing, if any. Call in a loop to catch up on
    /// firings missed between polls.
    pub fn fire_due(&mut self, now: Duration) -> bool {
        if self.spent || now < self.next_due {
            return false;
        }
        if self.repeating {
            self.next_due += self.interval;
        } else {
            self.spent = true;
        }
        true
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// How long until the next firing, for repaint requests.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.next_due.saturating_sub(now)
    }
}

const TIME_OF_DAY: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `HH:MM:SS` wall-clock label for log lines.
pub fn time_of_day_label() -> String {
    now_local_or_utc().format(TIME_OF_DAY).unwrap_or_default()
}

pub fn date_time_label() -> String {
    now_local_or_utc().format(DATE_TIME).unwrap_or_default()
}
