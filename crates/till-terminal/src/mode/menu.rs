//! # MENU Mode
//!
//! The business picker. Tab/Escape return to NUMPAD, `s` jumps straight to
//! SEARCH. Selecting a business happens outside the key path (the shell
//! calls `Terminal::switch_business`, which ends back in NUMPAD).

use crate::mode::{Mode, ModeId};
use crate::router::Key;
use crate::session::{Session, SessionSignal};

pub struct MenuMode;

impl Mode for MenuMode {
    fn id(&self) -> ModeId {
        ModeId::Menu
    }

    fn accepts_key(&self, key: &Key) -> bool {
        matches!(key, Key::Tab | Key::Escape) || key.is_char('s')
    }

    fn on_input(&self, session: &mut Session, key: Key) {
        match key {
            Key::Tab | Key::Escape => session.switch_to(ModeId::Numpad),
            key if key.is_char('s') => session.switch_to(ModeId::Search),
            _ => {}
        }
    }

    fn on_enter(&self, session: &mut Session) {
        if !session.menu_open {
            session.menu_open = true;
            session.signal(SessionSignal::MenuOpened);
        }
    }

    fn on_exit(&self, session: &mut Session) {
        if session.menu_open {
            session.menu_open = false;
            session.signal(SessionSignal::MenuClosed);
        }
    }
}
