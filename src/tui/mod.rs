//! Live terminal dashboard.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Dashboard session and application state.
pub mod runtime;
mod style;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub use runtime::App;

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode and the alternate screen, undone on drop.
struct TerminalSession {
    terminal: DashboardTerminal,
}

impl TerminalSession {
    fn open() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the dashboard until the user quits.
///
/// # Errors
///
/// Returns an `io::Error` if terminal setup, drawing or input polling fails.
/// The terminal is restored either way.
pub fn run(app: &mut App) -> io::Result<()> {
    let mut session = TerminalSession::open()?;
    drive(&mut session.terminal, app)
}

/// Draw, wait for a key until the next clock refresh is due, repeat.
fn drive(terminal: &mut DashboardTerminal, app: &mut App) -> io::Result<()> {
    let refresh = Duration::from_millis(runtime::REFRESH_INTERVAL_MS);
    while !app.quit {
        terminal.draw(|frame| layout::render(frame, app))?;

        let wait = refresh.saturating_sub(app.last_tick.elapsed());
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    controls::handle_key(app, key);
                }
                _ => {}
            }
        }

        if app.last_tick.elapsed() >= refresh {
            app.tick();
        }
    }
    Ok(())
}
