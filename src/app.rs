// App state and main event loop.
// Routes keyboard input, fires debounced searches, and applies finished fetches.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::cache::ResponseCache;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::state::{Debouncer, SearchState, Trigger};
use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// A fetch that has resolved, successfully or not.
#[derive(Debug)]
pub struct FetchDone {
    pub url: String,
    pub outcome: Result<Value>,
}

/// Main application state.
pub struct App {
    /// Query, display options, and results.
    pub search: SearchState,
    /// Pending search deadline from typing.
    pub debouncer: Debouncer,
    pub client: GitHubClient,
    pub cache: ResponseCache,
    /// Fetches spawned but not yet applied.
    pub in_flight: usize,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    fetch_tx: UnboundedSender<FetchDone>,
    fetch_rx: UnboundedReceiver<FetchDone>,
}

impl App {
    pub fn new(
        search: SearchState,
        debouncer: Debouncer,
        client: GitHubClient,
        cache: ResponseCache,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self {
            search,
            debouncer,
            client,
            cache,
            in_flight: 0,
            show_help: false,
            should_quit: false,
            fetch_tx,
            fetch_rx,
        }
    }

    /// Main event loop. Must run inside a tokio runtime.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.on_tick(Instant::now());
            self.apply_finished_fetches();
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key, Instant::now());
                }
            }
        }
        Ok(())
    }

    /// Apply a key press received at `now`.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('u') if ctrl => {
                if self.search.clear_input() {
                    self.debouncer.schedule(now);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.search.push_char(c);
                self.debouncer.schedule(now);
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.debouncer.schedule(now);
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Left => self.search.prev_page_size(),
            KeyCode::Right => self.search.next_page_size(),
            KeyCode::Tab => self.search.next_sort_key(),
            KeyCode::BackTab => self.search.prev_sort_key(),
            KeyCode::Up => self.search.select_prev(),
            KeyCode::Down => self.search.select_next(),
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    /// Fire the debounced search once its deadline has passed.
    pub fn on_tick(&mut self, now: Instant) {
        if self.debouncer.poll(now) {
            debug!(query = self.search.query(), "debounce elapsed");
            self.submit();
        }
    }

    /// Search for the current input now.
    pub fn submit(&mut self) {
        self.debouncer.cancel();
        if let Trigger::Fetch(url) = self.search.trigger(&self.client, &self.cache) {
            self.spawn_fetch(url);
        }
    }

    fn spawn_fetch(&mut self, url: String) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = client.fetch_json(&url).await;
            // Receiver only goes away on shutdown
            let _ = tx.send(FetchDone { url, outcome });
        });
    }

    /// Apply every fetch that has resolved since the last call.
    pub fn apply_finished_fetches(&mut self) {
        while let Ok(done) = self.fetch_rx.try_recv() {
            self.apply(done);
        }
    }

    /// Wait until every spawned fetch has been applied.
    pub async fn wait_for_fetches(&mut self) {
        while self.in_flight > 0 {
            match self.fetch_rx.recv().await {
                Some(done) => self.apply(done),
                None => break,
            }
        }
    }

    fn apply(&mut self, done: FetchDone) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.search.complete(&done.url, done.outcome, &mut self.cache);
    }
}
