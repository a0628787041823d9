//! Two-thread TUI orchestration.
//!
//! Terminal I/O runs on a dedicated OS thread; object store calls run on a
//! tokio worker task. Communication via `tokio::sync::mpsc` channels.

mod input;
#[cfg(test)]
mod input_tests;

pub use input::{handle_key, handle_term_event, key_to_command};

use std::io;
use std::panic::{self, PanicHookInfo};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use herbtrace_core::{Backend, HerbDatabase};

use crate::app::App;
use crate::ui;
use crate::worker::{self, Command, Outcome};

/// Terminal events forwarded from the UI reader thread.
pub enum TermEvent {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Sends panic reports to the log instead of stderr while the terminal is
/// in raw mode. The previous hook comes back on drop.
pub struct QuietPanics {
    previous: Option<PanicHook>,
}

impl QuietPanics {
    pub fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| {
            error!(panic = %info, "Panic during TUI session");
        }));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        // set_hook panics on an unwinding thread.
        if thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

/// Run the interactive TUI until the user quits.
///
/// Spawns the worker that owns `db`, enters raw mode, spawns a dedicated
/// terminal reader thread, and runs the main `select!` loop.
pub async fn run(db: HerbDatabase<Backend>) -> anyhow::Result<()> {
    let store_label = db.store().label();

    // 1. Worker owning the database
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(16);
    let worker_handle = tokio::spawn(worker::run(db, command_rx, outcome_tx));

    // 2. Enter raw mode, create terminal
    let quiet_panics = QuietPanics::install();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 3. Channels + cancellation token
    let cancel = CancellationToken::new();
    let (term_tx, mut term_rx) = mpsc::channel::<TermEvent>(64);

    // 4. Spawn dedicated OS thread for crossterm::event::read()
    let cancel_clone = cancel.clone();
    let ui_thread = std::thread::spawn(move || {
        loop {
            if cancel_clone.is_cancelled() {
                break;
            }
            // Poll with 50ms timeout so we can check cancellation
            if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        // Windows emits Press + Release per keystroke
                        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            continue;
                        }
                        if term_tx.blocking_send(TermEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(Event::Resize(w, h)) => {
                        if term_tx.blocking_send(TermEvent::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    // 5. Main loop
    let mut app = App::new(store_label);
    info!(store = store_label, "TUI started");
    let mut tick = tokio::time::interval(Duration::from_millis(50));

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = terminal.draw(|f| ui::draw_with_boundary(f, &mut app)) {
                    break Err(e.into());
                }
            }
            Some(term_event) = term_rx.recv() => {
                input::handle_term_event(&mut app, &command_tx, term_event).await;
            }
            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
        }
        if app.should_quit {
            break Ok(());
        }
    };

    // 6. Shutdown: stop the reader thread and any in-flight store call
    cancel.cancel();
    if ui_thread.join().is_err() {
        warn!("Terminal reader thread panicked");
    }
    drop(command_tx);
    worker_handle.abort();

    // 7. Restore terminal
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    drop(quiet_panics);
    info!("TUI stopped");

    result
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::cell::Cell;
    use std::panic;

    use super::QuietPanics;

    thread_local! {
        static REPORTED: Cell<usize> = const { Cell::new(0) };
    }

    #[test]
    fn quiet_panics_restores_previous_hook() {
        panic::set_hook(Box::new(|_| REPORTED.with(|n| n.set(n.get() + 1))));

        let quiet = QuietPanics::install();
        let _ = panic::catch_unwind(|| {
            panic!("render failed");
        });
        assert_eq!(REPORTED.with(Cell::get), 0);

        drop(quiet);
        let _ = panic::catch_unwind(|| {
            panic!("after session");
        });
        assert_eq!(REPORTED.with(Cell::get), 1);

        drop(panic::take_hook());
    }
}
