//! Message log — recent edits, errors and playback changes.

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub message: String,
    /// Seconds since startup.
    pub timestamp_secs: f64,
}

/// A bounded log, newest last.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
    max_entries: usize,
}

impl MessageLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    pub fn log(&mut self, message: impl Into<String>, timestamp_secs: f64) {
        self.entries.push(LogEntry {
            message: message.into(),
            timestamp_secs,
        });
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
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
    fn log_entries() {
        let mut log = MessageLog::new(10);
        log.log("wave: square", 0.5);
        log.log("playing", 1.0);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].message, "wave: square");
        assert_eq!(log.last().unwrap().message, "playing");
    }

    #[test]
    fn max_entries_evicts_oldest() {
        let mut log = MessageLog::new(2);
        log.log("a", 0.0);
        log.log("b", 1.0);
        log.log("c", 2.0);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].message, "b");
        assert_eq!(log.entries()[1].message, "c");
    }

    #[test]
    fn starts_empty() {
        assert!(MessageLog::new(5).is_empty());
    }
}
