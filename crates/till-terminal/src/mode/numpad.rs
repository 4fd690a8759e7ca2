//! # NUMPAD Mode
//!
//! The default mode: digits build a pending item number, `x`/`*` commits a
//! quantity multiplier, Enter looks up and scans.
//!
//! ## Key Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0-9        append digit to the pending input buffer                    │
//! │  x / *      commit buffer as quantity (empty/zero ⇒ 1), clear buffer   │
//! │  Enter      buffer non-empty: sanitize id, look up, add to ledger      │
//! │             buffer empty:     finalize ledger, or clear if finalized   │
//! │  Backspace  reset buffer and quantity                                  │
//! │  s / Tab    switch to SEARCH                                           │
//! │  m          switch to MENU                                             │
//! │  d          request receipt printing                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::mode::{Mode, ModeId};
use crate::router::Key;
use crate::session::Session;

pub struct NumpadMode;

impl Mode for NumpadMode {
    fn id(&self) -> ModeId {
        ModeId::Numpad
    }

    fn accepts_key(&self, key: &Key) -> bool {
        matches!(key, Key::Digit(_) | Key::Enter | Key::Backspace | Key::Tab)
            || matches!(key, Key::Char('*'))
            || key.is_char('x')
            || key.is_char('s')
            || key.is_char('m')
            || key.is_char('d')
    }

    fn on_input(&self, session: &mut Session, key: Key) {
        match key {
            Key::Digit(digit) => session.push_digit(digit),
            Key::Char('*') => session.commit_quantity(),
            key if key.is_char('x') => session.commit_quantity(),
            Key::Tab => session.switch_to(ModeId::Search),
            key if key.is_char('s') => session.switch_to(ModeId::Search),
            key if key.is_char('m') => session.switch_to(ModeId::Menu),
            Key::Backspace => session.clear_input(),
            key if key.is_char('d') => session.request_print(),
            Key::Enter => session.handle_enter(),
            other => debug!(?other, "numpad ignored accepted key"),
        }
    }
}
