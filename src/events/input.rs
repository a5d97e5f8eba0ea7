//! Crossterm adapter - translate terminal key events into toolkit input.
//!
//! Terminal hosts read `crossterm` events and feed the result to
//! [`crate::Toolkit::dispatch`]. Key names follow their DOM spellings so
//! widget handlers and tests read identically regardless of the host.

use crate::types::{KeyInput, Modifiers};

/// Translate a crossterm key event.
///
/// Returns `None` for release events and for keys the runtime has no use
/// for. `BackTab` becomes `Tab` + shift, matching how browsers report it.
pub fn key_input_from_crossterm(key: crossterm::event::KeyEvent) -> Option<KeyInput> {
    if key.kind == crossterm::event::KeyEventKind::Release {
        return None;
    }

    let mut modifiers = modifiers_from_crossterm(key.modifiers);
    let name: String = match key.code {
        crossterm::event::KeyCode::Char(c) => c.to_string(),
        crossterm::event::KeyCode::Enter => "Enter".into(),
        crossterm::event::KeyCode::Tab => "Tab".into(),
        crossterm::event::KeyCode::BackTab => {
            modifiers |= Modifiers::SHIFT;
            "Tab".into()
        }
        crossterm::event::KeyCode::Esc => "Escape".into(),
        crossterm::event::KeyCode::Backspace => "Backspace".into(),
        crossterm::event::KeyCode::Delete => "Delete".into(),
        crossterm::event::KeyCode::Left => "ArrowLeft".into(),
        crossterm::event::KeyCode::Right => "ArrowRight".into(),
        crossterm::event::KeyCode::Up => "ArrowUp".into(),
        crossterm::event::KeyCode::Down => "ArrowDown".into(),
        crossterm::event::KeyCode::Home => "Home".into(),
        crossterm::event::KeyCode::End => "End".into(),
        crossterm::event::KeyCode::PageUp => "PageUp".into(),
        crossterm::event::KeyCode::PageDown => "PageDown".into(),
        _ => return None,
    };

    Some(KeyInput {
        key: name,
        modifiers,
    })
}

fn modifiers_from_crossterm(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if m.contains(crossterm::event::KeyModifiers::SUPER) {
        out |= Modifiers::META;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    #[test]
    fn test_escape_and_char() {
        let esc = key_input_from_crossterm(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(esc, Some(KeyInput::new("Escape")));

        let a = key_input_from_crossterm(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(a, Some(KeyInput::new("a")));
    }

    #[test]
    fn test_backtab_is_shift_tab() {
        let key = key_input_from_crossterm(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(
            key,
            Some(KeyInput::with_modifiers("Tab", Modifiers::SHIFT))
        );
    }

    #[test]
    fn test_release_is_dropped() {
        let mut key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(key_input_from_crossterm(key), None);
    }
}
