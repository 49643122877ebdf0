use crate::animator::ThrottledAnimator;
use crate::metrics::DisplayMetrics;
use crate::reconciler;
use crate::session::Session;
use std::time::SystemTime;

/// Owns the session, the display animator, and the fetch-sequence token.
/// All mutation happens synchronously inside the handlers below; the
/// renderer only ever sees immutable snapshots.
#[derive(Debug)]
pub struct Engine {
    session: Session,
    animator: ThrottledAnimator,
    fetch_seq: u64,
    loading: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            session: Session::new(String::new()),
            animator: ThrottledAnimator::new(),
            fetch_seq: 0,
            loading: true,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn metrics(&self) -> DisplayMetrics {
        self.animator.metrics()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_seq(&self) -> u64 {
        self.fetch_seq
    }

    /// Bump the fetch token. Quote results carrying an older token belong
    /// to a superseded request and will be discarded on arrival.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.loading = true;
        self.fetch_seq
    }

    /// Deliver a fetched quote. Returns false (and changes nothing) when
    /// the token is stale, i.e. a reset has happened since the request.
    pub fn apply_quote(&mut self, seq: u64, text: String) -> bool {
        if seq != self.fetch_seq {
            return false;
        }
        self.session = Session::new(text);
        self.animator.reset();
        self.loading = false;
        true
    }

    /// Discard the current session and return the token the caller should
    /// attach to the replacement quote fetch.
    pub fn reset(&mut self) -> u64 {
        self.session = Session::new(String::new());
        self.animator.reset();
        self.begin_fetch()
    }

    pub fn handle_input(&mut self, raw: &str) {
        self.handle_input_at(raw, SystemTime::now());
    }

    pub fn handle_input_at(&mut self, raw: &str, now: SystemTime) {
        if self.loading || self.session.has_finished() {
            return;
        }

        let outcome = reconciler::apply_raw(&mut self.session, raw, now);

        if outcome.entered_typing {
            self.animator.arm(&self.session, now);
        }
        if outcome.finished {
            self.animator.finish(&self.session, now);
        } else if outcome.changed {
            self.animator.on_keystroke(&self.session, now);
        }
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(SystemTime::now());
    }

    pub fn on_tick_at(&mut self, now: SystemTime) {
        self.animator.on_tick(&self.session, now);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Status;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn loaded_engine(text: &str) -> Engine {
        let mut engine = Engine::new();
        let seq = engine.begin_fetch();
        assert!(engine.apply_quote(seq, text.to_string()));
        engine
    }

    #[test]
    fn test_input_ignored_while_loading() {
        let mut engine = Engine::new();

        engine.handle_input("c");

        assert_matches!(engine.session().status, Status::Waiting);
        assert_eq!(engine.session().input, "");
    }

    #[test]
    fn test_cat_scenario_end_to_end() {
        let mut engine = loaded_engine("cat");
        let t0 = SystemTime::now();

        engine.handle_input_at("c", t0);
        assert_matches!(engine.session().status, Status::Typing);
        assert_eq!(engine.session().error_count, 0);
        assert_eq!(engine.metrics().wpm, Some(0));
        assert_eq!(engine.metrics().accuracy, Some(100));

        engine.handle_input_at("cx", t0 + Duration::from_millis(400));
        assert_eq!(engine.session().error_count, 1);

        engine.handle_input_at("c", t0 + Duration::from_millis(800));
        assert_eq!(engine.session().error_count, 0);

        engine.handle_input_at("ca", t0 + Duration::from_millis(1200));
        engine.handle_input_at("cat", t0 + Duration::from_millis(1600));

        assert_matches!(engine.session().status, Status::Finished);
        assert!(engine.session().ended_at.is_some());
        assert_eq!(engine.metrics().progress, 100);

        // Finished sessions ignore further events entirely.
        engine.handle_input_at("catx", t0 + Duration::from_secs(2));
        assert_eq!(engine.session().input, "cat");
        assert_eq!(engine.session().current_index, 3);
    }

    #[test]
    fn test_final_sample_ignores_dwell() {
        let mut engine = loaded_engine("hi");
        let t0 = SystemTime::now();

        engine.handle_input_at("h", t0);
        // Finishing 50ms later is inside the dwell window, but the final
        // sample is forced regardless.
        engine.handle_input_at("hi", t0 + Duration::from_millis(50));

        assert_eq!(engine.metrics().progress, 100);
    }

    #[test]
    fn test_reset_yields_fresh_waiting_session() {
        let mut engine = loaded_engine("cat");
        engine.handle_input("c");
        engine.handle_input("ca");
        engine.handle_input("cat");
        assert_matches!(engine.session().status, Status::Finished);

        let seq = engine.reset();

        assert!(engine.is_loading());
        assert_matches!(engine.session().status, Status::Waiting);
        assert_eq!(engine.session().input, "");
        assert_eq!(engine.session().error_count, 0);
        assert_eq!(engine.metrics(), DisplayMetrics::empty());

        assert!(engine.apply_quote(seq, "dog".to_string()));
        assert_eq!(engine.session().text, "dog");
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_stale_quote_is_discarded() {
        let mut engine = Engine::new();
        let first = engine.begin_fetch();
        let second = engine.reset();
        assert!(second > first);

        // The first fetch resolves after the reset; it must not win.
        assert!(!engine.apply_quote(first, "stale quote".to_string()));
        assert!(engine.is_loading());

        assert!(engine.apply_quote(second, "fresh quote".to_string()));
        assert_eq!(engine.session().text, "fresh quote");
    }

    #[test]
    fn test_status_never_regresses() {
        let mut engine = loaded_engine("ab");

        engine.handle_input("a");
        assert_matches!(engine.session().status, Status::Typing);

        // Deleting back to empty input keeps the session in Typing.
        engine.handle_input("");
        assert_matches!(engine.session().status, Status::Typing);
        assert_eq!(engine.session().current_index, 0);
    }
}
