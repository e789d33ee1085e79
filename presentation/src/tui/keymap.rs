//! Global key bindings
//!
//! The active confirmation prompt and open overlays see keys first; whatever
//! they leave is mapped here.

use super::content::Scroll;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE: u16 = 10;

/// User action derived from a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Move focus along the navigation order
    FocusNext,
    ToggleHelp,
    ToggleDebug,
    ToggleZoom,
    Scroll(Scroll),
    /// Esc: abort what the user is waiting on
    Cancel,
    /// Enter: send the input line
    Submit,
    InsertChar(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Up/Down on the input line: walk the submitted-line history
    HistoryPrev,
    HistoryNext,
    None,
}

/// Map a key event; `editing` is true while the input line has focus.
pub fn map_key(key: KeyEvent, editing: bool) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Tab, _) => KeyAction::FocusNext,
        (KeyCode::F(1), _) => KeyAction::ToggleHelp,
        (KeyCode::F(12), _) => KeyAction::ToggleDebug,
        (KeyCode::Char('z'), KeyModifiers::CONTROL) => KeyAction::ToggleZoom,

        (KeyCode::PageUp, _) | (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            KeyAction::Scroll(Scroll::Up(PAGE))
        }
        (KeyCode::PageDown, _) | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
            KeyAction::Scroll(Scroll::Down(PAGE))
        }
        (KeyCode::Up, _) if editing => KeyAction::HistoryPrev,
        (KeyCode::Down, _) if editing => KeyAction::HistoryNext,
        (KeyCode::Up, _) => KeyAction::Scroll(Scroll::Up(1)),
        (KeyCode::Down, _) => KeyAction::Scroll(Scroll::Down(1)),

        (KeyCode::Esc, _) => KeyAction::Cancel,
        (KeyCode::Enter, _) => KeyAction::Submit,

        _ if editing => map_editing(key),
        (KeyCode::Home, _) => KeyAction::Scroll(Scroll::Top),
        (KeyCode::End, _) => KeyAction::Scroll(Scroll::Bottom),
        _ => KeyAction::None,
    }
}

fn map_editing(key: KeyEvent) -> KeyAction {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char(c) => KeyAction::InsertChar(c),
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Delete => KeyAction::Delete,
        KeyCode::Left => KeyAction::CursorLeft,
        KeyCode::Right => KeyAction::CursorRight,
        KeyCode::Home => KeyAction::CursorHome,
        KeyCode::End => KeyAction::CursorEnd,
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_global_bindings() {
        assert_eq!(map_key(ctrl('c'), true), KeyAction::Quit);
        assert_eq!(map_key(key(KeyCode::Tab), false), KeyAction::FocusNext);
        assert_eq!(map_key(key(KeyCode::F(12)), true), KeyAction::ToggleDebug);
        assert_eq!(map_key(ctrl('z'), false), KeyAction::ToggleZoom);
        assert_eq!(map_key(key(KeyCode::Esc), true), KeyAction::Cancel);
        assert_eq!(
            map_key(key(KeyCode::PageUp), true),
            KeyAction::Scroll(Scroll::Up(PAGE))
        );
    }

    #[test]
    fn test_editing_keys_only_while_editing() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), true),
            KeyAction::InsertChar('q')
        );
        assert_eq!(map_key(key(KeyCode::Char('q')), false), KeyAction::None);
        assert_eq!(map_key(key(KeyCode::Home), true), KeyAction::CursorHome);
        assert_eq!(
            map_key(key(KeyCode::Home), false),
            KeyAction::Scroll(Scroll::Top)
        );
        assert_eq!(map_key(ctrl('x'), true), KeyAction::None);
    }

    #[test]
    fn test_arrows_recall_history_while_editing() {
        assert_eq!(map_key(key(KeyCode::Up), true), KeyAction::HistoryPrev);
        assert_eq!(map_key(key(KeyCode::Down), true), KeyAction::HistoryNext);
        assert_eq!(
            map_key(key(KeyCode::Up), false),
            KeyAction::Scroll(Scroll::Up(1))
        );
        assert_eq!(
            map_key(key(KeyCode::Down), false),
            KeyAction::Scroll(Scroll::Down(1))
        );
    }

    #[test]
    fn test_shifted_chars_are_inserted() {
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(map_key(key, true), KeyAction::InsertChar('A'));
    }
}
