use crate::session::Session;
use std::time::SystemTime;

/// Rate-limited, renderer-facing snapshot. `None` renders as the `--`
/// placeholder before the first keystroke of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub wpm: Option<u32>,
    pub accuracy: Option<u32>,
    pub progress: u32,
}

impl DisplayMetrics {
    pub fn empty() -> Self {
        Self {
            wpm: None,
            accuracy: None,
            progress: 0,
        }
    }

    pub fn sample(session: &Session, now: SystemTime) -> Self {
        Self {
            wpm: Some(wpm(session, now)),
            accuracy: Some(accuracy(session)),
            progress: progress_percent(session),
        }
    }
}

/// Words per minute: characters-typed/5 over elapsed minutes, measured from
/// the first keystroke to the finish time (or `now` while still typing).
/// Zero until the session starts and for the first ~600ms, which guards the
/// divide-by-near-zero right after the first keystroke.
pub fn wpm(session: &Session, now: SystemTime) -> u32 {
    let Some(started_at) = session.started_at else {
        return 0;
    };
    let end = session.ended_at.unwrap_or(now);
    let elapsed_ms = end
        .duration_since(started_at)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    let minutes = elapsed_ms / 60_000.0;
    if minutes < 0.01 {
        return 0;
    }
    let words = session.input_len() as f64 / 5.0;
    (words / minutes).round() as u32
}

pub fn accuracy(session: &Session) -> u32 {
    let len = session.input_len();
    if len == 0 {
        return 100;
    }
    (((len - session.error_count) as f64 / len as f64) * 100.0).round() as u32
}

pub fn progress_percent(session: &Session) -> u32 {
    let total = session.text_len().max(1);
    ((session.current_index as f64 / total as f64) * 100.0).round() as u32
}
