//! Live terminal dashboard of the latest meter readings.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Dashboard application state.
pub mod runtime;
mod style;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::sim::scheduler::Scheduler;
use runtime::App;

/// Raw-mode alternate-screen terminal, restored on drop.
struct DashboardTerminal {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl DashboardTerminal {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let setup = execute!(io::stdout(), EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
        match setup {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }
}

impl Drop for DashboardTerminal {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the dashboard over `scheduler`'s store until the user quits.
///
/// Blocks the calling thread; the meter tasks keep running on the tokio
/// runtime meanwhile. The terminal is restored even if drawing fails.
///
/// # Errors
///
/// Returns an `io::Error` if terminal setup or drawing fails.
pub fn run(scheduler: Arc<Scheduler>) -> io::Result<()> {
    let mut screen = DashboardTerminal::enter()?;
    let mut app = App::new(scheduler);
    event_loop(&mut screen.terminal, &mut app)
}

/// Core event loop: poll input, refresh snapshot, draw.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        let timeout = Duration::from_millis(app.refresh_interval_ms());
        let deadline = app.last_refresh + timeout;
        let poll_timeout = deadline.saturating_duration_since(Instant::now());

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
            }
        }

        if app.last_refresh.elapsed() >= timeout {
            if !app.paused {
                app.refresh();
            }
            app.last_refresh = Instant::now();
        }
    }
}
