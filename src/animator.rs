use crate::metrics::DisplayMetrics;
use crate::session::Session;
use std::time::{Duration, SystemTime};

/// Cadence of the recurring display sample while a session is being typed.
pub const SAMPLE_INTERVAL_MS: u64 = 750;
/// Minimum dwell before a keystroke may force an out-of-band sample.
pub const MIN_DWELL_MS: u64 = 300;

/// Bounds the rate at which raw metrics are sampled for display, decoupling
/// the readouts from the per-keystroke cadence.
///
/// The animator is armed when a session enters Typing and disarmed on every
/// exit path (Finished, reset, teardown); a disarmed animator never samples,
/// so no dangling tick can observe a superseded session.
#[derive(Debug)]
pub struct ThrottledAnimator {
    interval: Duration,
    min_dwell: Duration,
    armed: bool,
    last_sample_at: Option<SystemTime>,
    metrics: DisplayMetrics,
}

impl ThrottledAnimator {
    pub fn new() -> Self {
        Self::with_cadence(
            Duration::from_millis(SAMPLE_INTERVAL_MS),
            Duration::from_millis(MIN_DWELL_MS),
        )
    }

    pub fn with_cadence(interval: Duration, min_dwell: Duration) -> Self {
        Self {
            interval,
            min_dwell,
            armed: false,
            last_sample_at: None,
            metrics: DisplayMetrics::empty(),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    /// Called on the Waiting -> Typing transition. Publishes the seed
    /// sample (0 wpm, 100% accuracy) and starts the recurring cadence.
    pub fn arm(&mut self, session: &Session, now: SystemTime) {
        self.armed = true;
        self.sample(session, now);
    }

    /// Recurring tick; samples at most once per interval while armed.
    pub fn on_tick(&mut self, session: &Session, now: SystemTime) {
        if self.armed && self.elapsed_since_sample(now) >= self.interval {
            self.sample(session, now);
        }
    }

    /// Keystroke-forced sample, gated by the dwell so raw typing speed
    /// cannot drive the readouts.
    pub fn on_keystroke(&mut self, session: &Session, now: SystemTime) {
        if self.armed && self.elapsed_since_sample(now) >= self.min_dwell {
            self.sample(session, now);
        }
    }

    /// Called on the Typing -> Finished transition: one final forced
    /// sample, then the cadence stops.
    pub fn finish(&mut self, session: &Session, now: SystemTime) {
        self.sample(session, now);
        self.armed = false;
    }

    /// Drops the cadence and returns the readouts to their placeholders.
    pub fn reset(&mut self) {
        self.armed = false;
        self.last_sample_at = None;
        self.metrics = DisplayMetrics::empty();
    }

    fn elapsed_since_sample(&self, now: SystemTime) -> Duration {
        match self.last_sample_at {
            Some(at) => now.duration_since(at).unwrap_or_default(),
            None => Duration::MAX,
        }
    }

    fn sample(&mut self, session: &Session, now: SystemTime) {
        self.metrics = DisplayMetrics::sample(session, now);
        self.last_sample_at = Some(now);
    }
}

impl Default for ThrottledAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler;

    fn typing_session(at: SystemTime) -> Session {
        let mut session = Session::new("the quick brown fox".to_string());
        reconciler::apply_raw(&mut session, "t", at);
        session
    }

    #[test]
    fn test_arm_publishes_seed_sample() {
        let now = SystemTime::now();
        let session = typing_session(now);
        let mut animator = ThrottledAnimator::new();

        animator.arm(&session, now);

        assert!(animator.is_armed());
        assert_eq!(animator.metrics().wpm, Some(0));
        assert_eq!(animator.metrics().accuracy, Some(100));
    }

    #[test]
    fn test_tick_respects_interval() {
        let now = SystemTime::now();
        let mut session = typing_session(now);
        let mut animator = ThrottledAnimator::new();
        animator.arm(&session, now);

        reconciler::apply_raw(&mut session, "th", now);

        // Too soon: the seed sample still stands.
        animator.on_tick(&session, now + Duration::from_millis(500));
        assert_eq!(animator.metrics().progress, 5);

        animator.on_tick(&session, now + Duration::from_millis(750));
        assert_eq!(animator.metrics().progress, 11);
    }

    #[test]
    fn test_keystroke_sample_gated_by_dwell() {
        let now = SystemTime::now();
        let mut session = typing_session(now);
        let mut animator = ThrottledAnimator::new();
        animator.arm(&session, now);

        reconciler::apply_raw(&mut session, "th", now);

        animator.on_keystroke(&session, now + Duration::from_millis(100));
        assert_eq!(animator.metrics().progress, 5);

        animator.on_keystroke(&session, now + Duration::from_millis(300));
        assert_eq!(animator.metrics().progress, 11);
    }

    #[test]
    fn test_disarmed_animator_never_samples() {
        let now = SystemTime::now();
        let session = typing_session(now);
        let mut animator = ThrottledAnimator::new();

        animator.on_tick(&session, now + Duration::from_secs(10));
        animator.on_keystroke(&session, now + Duration::from_secs(10));

        assert_eq!(animator.metrics(), DisplayMetrics::empty());
    }

    #[test]
    fn test_finish_samples_once_and_disarms() {
        let now = SystemTime::now();
        let mut session = typing_session(now);
        let mut animator = ThrottledAnimator::new();
        animator.arm(&session, now);

        reconciler::apply_raw(&mut session, "th", now);
        animator.finish(&session, now + Duration::from_millis(10));

        assert!(!animator.is_armed());
        assert_eq!(animator.metrics().progress, 11);

        // A stray tick after the finish must not move the readouts.
        reconciler::apply_raw(&mut session, "the", now);
        animator.on_tick(&session, now + Duration::from_secs(5));
        assert_eq!(animator.metrics().progress, 11);
    }

    #[test]
    fn test_reset_returns_placeholders() {
        let now = SystemTime::now();
        let session = typing_session(now);
        let mut animator = ThrottledAnimator::new();
        animator.arm(&session, now);

        animator.reset();

        assert!(!animator.is_armed());
        assert_eq!(animator.metrics(), DisplayMetrics::empty());
    }
}
