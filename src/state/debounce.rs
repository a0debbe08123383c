// Debounced fetch trigger.
// Tracks a single pending deadline that every input change pushes back.

use std::time::{Duration, Instant};

/// Idle time after the last keystroke before a search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Single-slot debouncer driven by the event loop's clock.
///
/// The loop calls [`Debouncer::schedule`] on each edit and [`Debouncer::poll`]
/// on each tick. Only the most recent schedule can fire.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending deadline with one `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending deadline fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns true exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(2000));

        debouncer.schedule(start);
        assert!(debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_millis(1999)));
        assert!(debouncer.poll(start + Duration::from_millis(2000)));

        // Already consumed
        assert!(!debouncer.poll(start + Duration::from_millis(5000)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reschedule_supersedes_earlier_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(2000));

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(1500));
        debouncer.schedule(start + Duration::from_millis(3000));

        // First two deadlines have passed but were superseded
        assert!(!debouncer.poll(start + Duration::from_millis(3500)));
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(3500)),
            Some(Duration::from_millis(1500))
        );
        assert!(debouncer.poll(start + Duration::from_millis(5000)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.delay(), DEFAULT_DEBOUNCE);

        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + Duration::from_secs(10)));
        assert_eq!(debouncer.remaining(start), None);
    }
}
