//! # SEARCH Mode
//!
//! Active while the search field owns the keyboard. The terminal only
//! claims Escape and Tab (back to NUMPAD); every other key stays with the
//! external text field, which drives filtering through the scheduler.

use crate::mode::{Mode, ModeId};
use crate::router::Key;
use crate::session::{Session, SessionSignal};

pub struct SearchMode;

impl Mode for SearchMode {
    fn id(&self) -> ModeId {
        ModeId::Search
    }

    fn accepts_key(&self, key: &Key) -> bool {
        matches!(key, Key::Escape | Key::Tab)
    }

    fn on_input(&self, session: &mut Session, key: Key) {
        if matches!(key, Key::Escape | Key::Tab) {
            session.switch_to(ModeId::Numpad);
        }
    }

    fn on_enter(&self, session: &mut Session) {
        // A blur event and an explicit switch can both land here; only the
        // first request focuses the field.
        if !session.search_focused {
            session.search_focused = true;
            session.signal(SessionSignal::FocusSearchField);
        }
    }

    fn on_exit(&self, session: &mut Session) {
        if session.search_focused {
            session.search_focused = false;
            session.signal(SessionSignal::BlurSearchField);
        }
    }
}
