use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A rate limiter for progress logging, shared by every worker of a run.
///
/// It never affects training, it only decides whether a log line is worth emitting.
#[derive(Debug)]
pub struct StatusLogger {
    last: Mutex<Instant>,
}

impl Default for StatusLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLogger {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Instant::now()),
        }
    }

    /// Whether at least `interval_secs` seconds went by since the last time this
    /// returned `true` (or since creation).
    ///
    /// When several workers ask at once only one of them gets `true`.
    pub fn due(&self, interval_secs: u64) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock();

        if now.duration_since(*last) < Duration::from_secs(interval_secs) {
            return false;
        }

        *last = now;
        true
    }
}
