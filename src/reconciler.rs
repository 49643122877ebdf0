use crate::session::{Session, Status};
use std::time::SystemTime;

/// What a single reconciliation pass did to the session, so the engine can
/// decide whether to force a display sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub entered_typing: bool,
    pub finished: bool,
    pub changed: bool,
}

/// Fold a raw input value (as delivered by an uncontrolled text surface)
/// into the session as a pure suffix append or pure suffix truncation.
///
/// Growth keeps the validated prefix and accepts only the raw tail; shrink
/// drops validated characters from the end. Mid-text edits and pastes thus
/// collapse to the nearest valid append/truncation instead of corrupting
/// index-based comparison. Only the boundary character of a growth or
/// shrink is scored, even when the event spans several characters.
pub fn apply_raw(session: &mut Session, raw: &str, now: SystemTime) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    // The input surface is disabled once Finished; late events are no-ops.
    if session.has_finished() {
        return outcome;
    }

    let prev_len = session.input_len();
    let raw_len = raw.chars().count();
    let text_len = session.text_len();

    // Growth is capped at the reference length so the input can never
    // overshoot the text it is compared against.
    let next: String = if raw_len >= prev_len {
        let mut grown = session.input.clone();
        grown.extend(
            raw.chars()
                .skip(prev_len)
                .take(text_len.saturating_sub(prev_len)),
        );
        grown
    } else {
        session.input.chars().take(raw_len).collect()
    };
    let next_len = next.chars().count();

    if session.status == Status::Waiting && next_len > 0 {
        session.status = Status::Typing;
        session.started_at = Some(now);
        outcome.entered_typing = true;
    }

    if next_len > prev_len {
        let idx = next_len - 1;
        if next.chars().nth(idx) != session.expected_char(idx) {
            session.error_count += 1;
        }
        outcome.changed = true;
    } else if next_len < prev_len {
        let idx = prev_len - 1;
        if session.input.chars().nth(idx) != session.expected_char(idx) {
            session.error_count = session.error_count.saturating_sub(1);
        }
        outcome.changed = true;
    }

    session.input = next;
    session.current_index = next_len;
    // A multi-character shrink removes at most one scored error, so clamp
    // to keep error_count <= input length.
    session.error_count = session.error_count.min(next_len);

    if session.status == Status::Typing && next_len == text_len {
        session.status = Status::Finished;
        session.ended_at = Some(now);
        outcome.finished = true;
    }

    outcome
}
