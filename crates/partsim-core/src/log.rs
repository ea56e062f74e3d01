//! Append-only simulation event log.
//!
//! Every state change the tick engine performs produces one human-readable
//! entry tagged with the clock value at the time of the event (the
//! pre-increment value, i.e. the tick during which the event occurred).
//! Entries are never removed or reordered; the retrieval window returns
//! the newest entries in chronological order.

/// One timestamped log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The tick during which the event occurred.
    pub tick: u64,
    /// Human-readable description of the state change.
    pub message: String,
}

impl core::fmt::Display for LogEntry {
    /// Renders as `[T007] message` -- the zero-padded tick tag the
    /// dashboard log panel expects.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[T{:03}] {}", self.tick, self.message)
    }
}

/// Append-only ordered record of simulation events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    /// Entries in insertion order, oldest first.
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry tagged with the given tick.
    ///
    /// Also mirrors the line to the tracing subscriber at debug level so a
    /// terminal run shows the same narrative the dashboard log panel does.
    pub fn record(&mut self, tick: u64, message: String) {
        tracing::debug!(tick, %message, "sim event");
        self.entries.push(LogEntry { tick, message });
    }

    /// The most recent `count` entries, rendered, oldest of the returned
    /// window first. `count == 0` yields an empty vector.
    pub fn recent(&self, count: usize) -> Vec<String> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries
            .iter()
            .skip(skip)
            .map(ToString::to_string)
            .collect()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.record(0, String::from("first"));
        log.record(0, String::from("second"));
        log.record(1, String::from("third"));
        log.record(12, String::from("fourth"));
        log
    }

    #[test]
    fn entries_render_with_padded_tick_tag() {
        let log = sample_log();
        assert_eq!(log.recent(1), vec![String::from("[T012] fourth")]);
    }

    #[test]
    fn recent_returns_newest_oldest_first() {
        let log = sample_log();
        assert_eq!(
            log.recent(3),
            vec![
                String::from("[T000] second"),
                String::from("[T001] third"),
                String::from("[T012] fourth"),
            ]
        );
    }

    #[test]
    fn recent_with_count_larger_than_log_returns_everything() {
        let log = sample_log();
        assert_eq!(log.recent(100).len(), 4);
    }

    #[test]
    fn recent_zero_yields_empty() {
        let log = sample_log();
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let log = sample_log();
        let ticks: Vec<u64> = log.entries().iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![0, 0, 1, 12]);
    }
}
