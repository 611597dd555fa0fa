use std::time::{Duration, Instant};

pub const SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Coalesces bursts of calls: each `call` replaces the pending value and
/// restarts the window, and only the last value fires once the window has
/// passed. Time is passed in so the owner decides when to poll.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn call(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.pending, Some((deadline, _)) if now >= *deadline);
        if due { self.flush() } else { None }
    }

    /// Fire immediately regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_call_within_window_wins() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.call(start, "m");
        debouncer.call(start + Duration::from_millis(100), "me");
        debouncer.call(start + Duration::from_millis(200), "mee");

        assert_eq!(debouncer.poll(start + Duration::from_millis(450)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), Some("mee"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.call(start, 1);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_flush_ignores_deadline() {
        let mut debouncer = Debouncer::default();
        debouncer.call(Instant::now(), "now");
        assert_eq!(debouncer.flush(), Some("now"));
        assert_eq!(debouncer.flush(), None);
    }
}
