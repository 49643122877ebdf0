pub mod animator;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod quote;
pub mod reconciler;
pub mod runtime;
pub mod session;
pub mod ui;

use crate::{
    config::{ConfigStore, FileConfigStore},
    engine::Engine,
    quote::{spawn_fetch, HttpQuoteSource, QuoteSource, StaticQuoteSource},
    runtime::{CrosstermEventSource, Event, EventSource, FixedTicker, Runner, Ticker},
    session::Status,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::Sender,
    sync::Arc,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// minimal quote typing tui with live speed, accuracy, and progress readouts
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing TUI: fetches a short quote, reconciles your keystrokes against it, and shows live words-per-minute, accuracy, and progress at a steady display cadence."
)]
pub struct Cli {
    /// plain-text endpoint to fetch quotes from
    #[clap(short = 'u', long)]
    quote_url: Option<String>,

    /// custom text to type instead of a fetched quote
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// seconds to wait for the quote endpoint before falling back
    #[clap(short = 't', long)]
    timeout_secs: Option<u64>,
}

pub struct App {
    pub engine: Engine,
    source: Arc<dyn QuoteSource>,
    events_tx: Sender<Event>,
}

impl App {
    pub fn new(source: Arc<dyn QuoteSource>, events_tx: Sender<Event>) -> Self {
        Self {
            engine: Engine::new(),
            source,
            events_tx,
        }
    }

    /// Kick off a fetch for the current session (initial load and resets).
    pub fn request_quote(&mut self) {
        let seq = self.engine.begin_fetch();
        spawn_fetch(self.source.clone(), seq, self.events_tx.clone());
    }

    /// Discard the session and fetch a replacement quote. The token handed
    /// out by the engine makes any in-flight fetch stale.
    pub fn reset(&mut self) {
        let seq = self.engine.reset();
        spawn_fetch(self.source.clone(), seq, self.events_tx.clone());
    }

    fn typed(&mut self, c: char) {
        let mut raw = self.engine.session().input.clone();
        raw.push(c);
        self.engine.handle_input(&raw);
    }

    fn backspaced(&mut self) {
        let input = &self.engine.session().input;
        let len = input.chars().count();
        let raw: String = input.chars().take(len.saturating_sub(1)).collect();
        self.engine.handle_input(&raw);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    if let Some(url) = cli.quote_url.clone() {
        cfg.quote_url = url;
    }
    if let Some(secs) = cli.timeout_secs {
        cfg.timeout_secs = secs;
    }

    let source: Arc<dyn QuoteSource> = match cli.prompt.clone() {
        Some(prompt) => Arc::new(StaticQuoteSource::new(prompt)),
        None => Arc::new(HttpQuoteSource::new(cfg.quote_url.clone(), cfg.timeout_secs)),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(TICK_RATE_MS));
    let mut app = App::new(source, events.sender());
    app.request_quote();

    let result = start_tui(&mut terminal, &mut app, Runner::new(events, ticker));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            Event::Tick => {
                app.engine.on_tick();

                // Only typing sessions have moving readouts worth redrawing.
                if app.engine.session().status == Status::Typing {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            Event::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            Event::Quote { seq, text } => {
                if app.engine.apply_quote(seq, text) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            Event::Key(key) => {
                match key.code {
                    KeyCode::Esc => {
                        break;
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break;
                    }
                    KeyCode::Tab => {
                        app.reset();
                    }
                    KeyCode::Backspace => {
                        app.backspaced();
                    }
                    KeyCode::Char(c) => {
                        app.typed(c);
                    }
                    _ => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
