//! Log sink and recent-activity feed shown in the UI.

use std::collections::VecDeque;

use crate::scheduler::time_of_day_label;

pub const MAX_ACTIVITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub time: String,
    pub severity: Severity,
    pub message: String,
}

/// Append-only, displayed oldest first. Every entry is mirrored to tracing.
#[derive(Debug, Default)]
pub struct LogSink {
    entries: Vec<LogEntry>,
}

impl LogSink {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info | Severity::Success => tracing::info!(target: "journal", "{message}"),
            Severity::Warning => tracing::warn!(target: "journal", "{message}"),
            Severity::Error => tracing::error!(target: "journal", "{message}"),
        }
        self.entries.push(LogEntry {
            time: time_of_day_label(),
            severity,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }
}

/// Most recent first, capped at [`MAX_ACTIVITY`].
#[derive(Debug, Default)]
pub struct ActivityFeed {
    items: VecDeque<LogEntry>,
}

impl ActivityFeed {
    pub fn record(&mut self, message: impl Into<String>) {
        self.items.push_front(LogEntry {
            time: time_of_day_label(),
            severity: Severity::Info,
            message: message.into(),
        });
        self.items.truncate(MAX_ACTIVITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_insertion_order() {
        let mut log = LogSink::default();
        log.info("one");
        log.warning("two");
        let msgs: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, vec!["one", "two"]);
        assert_eq!(log.count(Severity::Warning), 1);
    }

    #[test]
    fn activity_feed_is_bounded_newest_first() {
        let mut feed = ActivityFeed::default();
        for i in 0..7 {
            feed.record(format!("event {i}"));
        }
        assert_eq!(feed.len(), MAX_ACTIVITY);
        let first = feed.iter().next().map(|e| e.message.clone());
        assert_eq!(first.as_deref(), Some("event 6"));
        let last = feed.iter().last().map(|e| e.message.clone());
        assert_eq!(last.as_deref(), Some("event 2"));
    }
}
