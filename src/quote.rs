use crate::runtime::Event;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Substituted whenever the quote endpoint cannot produce usable text.
pub const FALLBACK_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

/// Plain-text quote endpoint queried by default.
pub const DEFAULT_QUOTE_URL: &str = "https://api.kanye.rest/text";

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Supplies reference text for a session. Implementations never fail: any
/// transport or decode problem resolves to the fallback sentence.
pub trait QuoteSource: Send + Sync + 'static {
    fn fetch(&self) -> String;
}

/// Blocking HTTP source for plain-text quote endpoints.
pub struct HttpQuoteSource {
    url: String,
    timeout: Duration,
}

impl HttpQuoteSource {
    pub fn new(url: String, timeout_secs: u64) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch(&self) -> String {
        let body = ureq::get(self.url.as_str())
            .config()
            .timeout_global(Some(self.timeout))
            .build()
            .call()
            .ok()
            .and_then(|resp| resp.into_body().read_to_string().ok());

        match body {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => FALLBACK_TEXT.to_string(),
        }
    }
}

/// Fixed-text source used for `--prompt` runs and in tests.
pub struct StaticQuoteSource {
    text: String,
}

impl StaticQuoteSource {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl QuoteSource for StaticQuoteSource {
    fn fetch(&self) -> String {
        if self.text.trim().is_empty() {
            FALLBACK_TEXT.to_string()
        } else {
            self.text.clone()
        }
    }
}

/// Resolve a quote on a background thread and deliver it into the event
/// channel tagged with the request token. The receiver decides whether the
/// token is still current; a send failure just means the app already quit.
pub fn spawn_fetch(source: Arc<dyn QuoteSource>, seq: u64, tx: Sender<Event>) {
    thread::spawn(move || {
        let text = source.fetch();
        let _ = tx.send(Event::Quote { seq, text });
    });
}
