//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;
use crate::profile::Preset;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char('1') => app.switch_preset(Preset::Default),
        KeyCode::Char('2') => app.switch_preset(Preset::HighUsage),
        KeyCode::Char('3') => app.switch_preset(Preset::Optimal),
        KeyCode::Char('a') => app.apply_recommendation(0),
        KeyCode::Char('b') => app.apply_recommendation(1),
        KeyCode::Char('c') => app.apply_recommendation(2),
        KeyCode::Char('r') => app.resample(),
        _ => {}
    }
}
