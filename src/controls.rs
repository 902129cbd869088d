use crossterm::event::KeyCode;

use crate::session::{Session, ThrowResult};
use crate::targets::Multiplier;

/// Session operations reachable from the training keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hit(Option<Multiplier>),
    Miss,
    Skip,
    Submit,
    Undo,
}

impl Action {
    /// Key binding on the training screen. `d`/`t` only exist under the
    /// multiplier rule.
    pub fn from_key(code: KeyCode, multiplier_enabled: bool) -> Option<Self> {
        match code {
            KeyCode::Char('h') => Some(Action::Hit(None)),
            KeyCode::Char('d') if multiplier_enabled => Some(Action::Hit(Some(Multiplier::Double))),
            KeyCode::Char('t') if multiplier_enabled => Some(Action::Hit(Some(Multiplier::Treble))),
            KeyCode::Char('m') => Some(Action::Miss),
            KeyCode::Char('s') => Some(Action::Skip),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::Undo),
            _ => None,
        }
    }

    /// Returns false if the session ignored it
    pub fn apply(self, session: &mut Session) -> bool {
        match self {
            Action::Hit(multiplier) => session.record_throw(ThrowResult::Hit, multiplier),
            Action::Miss => session.record_throw(ThrowResult::Miss, None),
            Action::Skip => session.skip_target(),
            Action::Submit => session.submit_round(),
            Action::Undo => session.undo(),
        }
    }
}
