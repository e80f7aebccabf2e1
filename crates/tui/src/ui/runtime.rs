//! Runtime: event loop and input routing for the interactive form.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Forward terminal input from a dedicated blocking thread over a channel.
//! - Dispatch candidate fetches and feed their completions back into the
//!   combobox, which drops superseded ones.
//! - Render after every handled event.
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use combobox_engine::{CandidateFetcher, CandidatePool, FetchCompletion, StaticFetcher, spawn_fetch};
use combobox_types::{Choice, ComboboxConfig};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use tokio::{signal, sync::mpsc};
use tracing::{debug, warn};

use crate::ui::components::form::{CallSite, FormEffect, SubmitFormComponent, SubmitFormState, desired_form_height};
use crate::ui::theme::NordTheme;

/// Everything the interactive form needs to start.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub site: CallSite,
    pub config: ComboboxConfig,
    pub pool: CandidatePool,
    pub committed: Option<Choice>,
    /// Artificial fetch delay, useful to watch stale results being dropped.
    pub fetch_latency: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read event: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

struct FormRuntime {
    form: SubmitFormState,
    component: SubmitFormComponent,
    theme: NordTheme,
    fetcher: Arc<dyn CandidateFetcher>,
    fetch_sender: mpsc::UnboundedSender<FetchCompletion>,
}

impl FormRuntime {
    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        // Rebuild focus just before rendering so layout changes are reflected
        self.form.rebuild_focus();
        terminal.draw(|frame| {
            let area = frame.area();
            let height = if self.form.is_open() { desired_form_height(&self.form) } else { 1 };
            let rect = Rect {
                x: area.x,
                y: area.y,
                width: area.width.min(110),
                height: height.min(area.height),
            };
            self.component.render(frame, rect, &mut self.form, &self.theme);
        })?;
        Ok(())
    }

    fn dispatch_fetch(&mut self) {
        let (ticket, request) = self.form.combobox_mut().begin_fetch();
        spawn_fetch(Arc::clone(&self.fetcher), ticket, request, self.fetch_sender.clone());
    }

    fn handle_completion(&mut self, completion: FetchCompletion) {
        let combobox = self.form.combobox_mut();
        let applied = match &completion.result {
            Ok(pool) => combobox.apply_fetch(&completion.ticket, pool.clone()),
            Err(error) => combobox.apply_fetch_error(&completion.ticket, error),
        };
        debug!(generation = completion.ticket.generation, applied, "fetch completion handled");
    }

    fn handle_key(&mut self, key: KeyEvent) -> LoopControl {
        if key.kind == KeyEventKind::Release {
            return LoopControl::Continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return LoopControl::Exit;
        }
        if !self.form.is_open() {
            return match key.code {
                KeyCode::Enter => {
                    self.form.open();
                    self.dispatch_fetch();
                    LoopControl::Continue
                }
                KeyCode::Char('q') | KeyCode::Esc => LoopControl::Exit,
                _ => LoopControl::Continue,
            };
        }
        match self.form.handle_key(key) {
            FormEffect::FetchCandidates => self.dispatch_fetch(),
            FormEffect::Submitted(outcome) => debug!(?outcome, "form submitted"),
            FormEffect::Closed | FormEffect::None => {}
        }
        LoopControl::Continue
    }

    fn handle_input_event(&mut self, input_event: Event) -> LoopControl {
        match input_event {
            Event::Key(key_event) => self.handle_key(key_event),
            Event::Paste(text) if self.form.is_open() => {
                self.form.combobox_mut().insert_str(&text);
                self.dispatch_fetch();
                LoopControl::Continue
            }
            _ => LoopControl::Continue,
        }
    }
}

/// Entry point for the interactive form: sets up the terminal, runs the
/// event loop and restores the terminal on exit.
pub async fn run_app(options: RuntimeOptions) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let (fetch_sender, mut fetch_receiver) = mpsc::unbounded_channel();

    let mut fetcher = StaticFetcher::new(options.pool.clone());
    if let Some(latency) = options.fetch_latency {
        fetcher = fetcher.with_latency(latency);
    }
    let mut form = SubmitFormState::new(options.site, &options.config, options.pool).with_committed(options.committed);
    form.open();

    let mut runtime = FormRuntime {
        form,
        component: SubmitFormComponent::default(),
        theme: NordTheme::new(),
        fetcher: Arc::new(fetcher),
        fetch_sender,
    };
    runtime.dispatch_fetch();

    let mut terminal = setup_terminal()?;
    let result = async {
        runtime.render(&mut terminal)?;
        loop {
            tokio::select! {
                maybe_event = input_receiver.recv() => {
                    let Some(input_event) = maybe_event else { break };
                    if runtime.handle_input_event(input_event) == LoopControl::Exit {
                        break;
                    }
                }
                Some(completion) = fetch_receiver.recv() => {
                    runtime.handle_completion(completion);
                }
                _ = signal::ctrl_c() => break,
            }
            runtime.render(&mut terminal)?;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    cleanup_terminal(&mut terminal)?;
    result
}
