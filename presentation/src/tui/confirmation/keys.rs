use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Decline,
}

/// Map a key to a prompt decision.
///
/// `1` / `y` / `Y` confirm, `2` / `n` / `N` / Esc decline. Anything else,
/// including modified keys, is left for the rest of the UI.
pub fn interpret_key(key: &KeyEvent) -> Option<Decision> {
    if key.kind == KeyEventKind::Release
        || key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Char('1' | 'y' | 'Y') => Some(Decision::Confirm),
        KeyCode::Char('2' | 'n' | 'N') | KeyCode::Esc => Some(Decision::Decline),
        _ => None,
    }
}
