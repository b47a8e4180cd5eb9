//! Key mapping from terminal events to game actions.
//!
//! Default bindings:
//!
//! | Action | Keys |
//! |--------|------|
//! | move-left | Left, `a`, `h` |
//! | move-right | Right, `d`, `l` |
//! | soft-drop | Down, `s`, `j` |
//! | rotate | Up, `w`, `k`, `x` |
//! | hard-drop | Space, Enter |
//! | toggle-pause | `p`, Esc |
//! | restart | `r` |
//!
//! Letter keys match in either case. `q` and Ctrl-C quit (see [`should_quit`]).

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Physical key to action table. Several keys may share one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<(KeyCode, GameAction)>,
}

/// Letters compare case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl Keymap {
    /// A keymap with no bindings
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a binding. A key already bound is rebound to `action`.
    pub fn bind(&mut self, code: KeyCode, action: GameAction) -> &mut Self {
        let code = normalize(code);
        self.bindings.retain(|(bound, _)| *bound != code);
        self.bindings.push((code, action));
        self
    }

    pub fn unbind(&mut self, code: KeyCode) {
        let code = normalize(code);
        self.bindings.retain(|(bound, _)| *bound != code);
    }

    pub fn action_for(&self, key: KeyEvent) -> Option<GameAction> {
        // Ctrl/Alt chords are never game input.
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        let code = normalize(key.code);
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|&(_, action)| action)
    }

    /// Keys bound to `action`, in binding order
    pub fn keys_for(&self, action: GameAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|&(code, _)| code)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KeyCode::Left, GameAction::MoveLeft)
            .bind(KeyCode::Char('a'), GameAction::MoveLeft)
            .bind(KeyCode::Char('h'), GameAction::MoveLeft)
            .bind(KeyCode::Right, GameAction::MoveRight)
            .bind(KeyCode::Char('d'), GameAction::MoveRight)
            .bind(KeyCode::Char('l'), GameAction::MoveRight)
            .bind(KeyCode::Down, GameAction::SoftDrop)
            .bind(KeyCode::Char('s'), GameAction::SoftDrop)
            .bind(KeyCode::Char('j'), GameAction::SoftDrop)
            .bind(KeyCode::Up, GameAction::Rotate)
            .bind(KeyCode::Char('w'), GameAction::Rotate)
            .bind(KeyCode::Char('k'), GameAction::Rotate)
            .bind(KeyCode::Char('x'), GameAction::Rotate)
            .bind(KeyCode::Char(' '), GameAction::HardDrop)
            .bind(KeyCode::Enter, GameAction::HardDrop)
            .bind(KeyCode::Char('p'), GameAction::TogglePause)
            .bind(KeyCode::Esc, GameAction::TogglePause)
            .bind(KeyCode::Char('r'), GameAction::Restart);
        map
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key.modifiers.contains(KeyModifiers::CONTROL))
}
