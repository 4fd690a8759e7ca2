//! # Input Router
//!
//! Physical/virtual key events and their dispatch through the active mode.
//!
//! The router asks the active mode `accepts_key` first; a rejected key
//! passes through untouched (the shell keeps its default behavior). Only
//! accepted keys are forwarded to `on_input`.

use crate::mode::mode_for;
use crate::session::Session;

// =============================================================================
// Key Events
// =============================================================================

/// A key event as delivered by the shell (keyboard or on-screen button).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A digit key, 0-9.
    Digit(u8),

    /// A printable character key (letters, '*').
    Char(char),

    Enter,
    Backspace,
    Tab,
    Escape,
}

impl Key {
    /// Case-insensitive character match, so `x` and `X` behave alike.
    pub fn is_char(&self, wanted: char) -> bool {
        matches!(self, Key::Char(c) if c.eq_ignore_ascii_case(&wanted))
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Routes one key event through the active mode.
///
/// Returns `true` when the mode accepted and handled the key (the shell
/// should suppress its default behavior), `false` when the key passed
/// through untouched.
pub(crate) fn route(session: &mut Session, key: Key) -> bool {
    let mode = mode_for(session.current_mode());
    if !mode.accepts_key(&key) {
        return false;
    }
    mode.on_input(session, key);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_char_folds_case() {
        assert!(Key::Char('x').is_char('x'));
        assert!(Key::Char('X').is_char('x'));
        assert!(!Key::Char('y').is_char('x'));
        assert!(!Key::Enter.is_char('x'));
    }
}
