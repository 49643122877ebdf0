use std::time::SystemTime;

/// Lifecycle of a single typing attempt. Transitions are one-directional:
/// Waiting -> Typing (first character) -> Finished (input covers the quote).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Typing,
    Finished,
}

/// The mutable record of one typing attempt. The reference text is fixed at
/// construction; a reset replaces the whole Session rather than mutating it.
#[derive(Debug, Clone)]
pub struct Session {
    pub text: String,
    pub input: String,
    pub status: Status,
    pub started_at: Option<SystemTime>,
    pub ended_at: Option<SystemTime>,
    pub error_count: usize,
    pub current_index: usize,
}

impl Session {
    pub fn new(text: String) -> Self {
        Self {
            text,
            input: String::new(),
            status: Status::Waiting,
            started_at: None,
            ended_at: None,
            error_count: 0,
            current_index: 0,
        }
    }

    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.text.chars().nth(idx)
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.status == Status::Finished
    }
}
