use std::time::{Duration, Instant};

/// Delay between animation frames (nominally 100 fps).
pub const FRAME_DELAY: Duration = Duration::from_millis(10);
/// Pause on the completed picture before the animation restarts.
pub const RESTART_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    delay: Duration,
    due: Instant,
}

/// A single deferred tick.
///
/// Posting a new tick replaces any pending one, so at most one is ever in
/// flight. The owner polls [`take_due`](Self::take_due) from its event loop.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<Pending>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_delayed(&mut self, delay: Duration) {
        self.post_delayed_from(Instant::now(), delay);
    }

    pub fn post_delayed_from(&mut self, now: Instant, delay: Duration) {
        self.pending = Some(Pending {
            delay,
            due: now + delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The delay the pending tick was posted with.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.map(|p| p.delay)
    }

    /// How long until the pending tick is due; zero if already overdue.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Consume the pending tick if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(p) if p.due <= now => {
                self.pending = None;
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
    fn nothing_pending_initially() {
        let s = FrameScheduler::new();
        assert!(!s.is_pending());
        assert_eq!(s.time_until_due(Instant::now()), None);
    }

    #[test]
    fn tick_becomes_due_after_its_delay() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new();
        s.post_delayed_from(t0, FRAME_DELAY);
        assert_eq!(s.pending_delay(), Some(FRAME_DELAY));
        assert_eq!(s.time_until_due(t0), Some(FRAME_DELAY));
        assert!(!s.take_due(t0 + Duration::from_millis(9)));
        assert!(s.take_due(t0 + FRAME_DELAY));
        assert!(!s.is_pending());
        assert!(!s.take_due(t0 + RESTART_DELAY));
    }

    #[test]
    fn posting_replaces_the_pending_tick() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new();
        s.post_delayed_from(t0, FRAME_DELAY);
        s.post_delayed_from(t0, RESTART_DELAY);
        assert_eq!(s.pending_delay(), Some(RESTART_DELAY));
        assert!(!s.take_due(t0 + FRAME_DELAY));
    }

    #[test]
    fn overdue_tick_waits_zero() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new();
        s.post_delayed_from(t0, FRAME_DELAY);
        assert_eq!(s.time_until_due(t0 + RESTART_DELAY), Some(Duration::ZERO));
        s.cancel();
        assert_eq!(s.time_until_due(t0), None);
    }
}
