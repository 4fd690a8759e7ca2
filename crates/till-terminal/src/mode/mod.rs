//! # Mode State Machine
//!
//! Named interaction modes over a closed set of identifiers, each a bundle
//! of capabilities behind the [`Mode`] trait.
//!
//! ## Transition Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mode Transitions                                    │
//! │                                                                         │
//! │            ┌────────────┐  s / Tab   ┌────────────┐                    │
//! │            │            │───────────►│            │                    │
//! │            │   NUMPAD   │            │   SEARCH   │                    │
//! │            │  (initial) │◄───────────│            │                    │
//! │            └──────┬─────┘ Esc / Tab  └────────────┘                    │
//! │                   │ m                       ▲                           │
//! │                   ▼                         │ s                         │
//! │            ┌────────────┐ ────────────────┘                            │
//! │            │    MENU    │                                              │
//! │            │            │─── Tab / Esc ──► NUMPAD                      │
//! │            └────────────┘                                              │
//! │                                                                         │
//! │  switch_to(target):  current.on_exit() → current := target →           │
//! │                      target.on_enter()                                  │
//! │                                                                         │
//! │  This ordering holds on EVERY path, including transitions triggered    │
//! │  from inside another mode's on_input. Enter/exit hooks are idempotent  │
//! │  because a field blur and an explicit switch can both request the      │
//! │  same transition.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod menu;
mod numpad;
mod search;

pub use menu::MenuMode;
pub use numpad::NumpadMode;
pub use search::SearchMode;

use serde::{Deserialize, Serialize};

use crate::router::Key;
use crate::session::Session;

// =============================================================================
// Mode Identifiers
// =============================================================================

/// The closed set of interaction modes. Exactly one is active; there is no
/// terminal state and any mode may transition to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    Numpad,
    Search,
    Menu,
}

impl ModeId {
    /// Display name for logs and shells.
    pub fn name(&self) -> &'static str {
        match self {
            ModeId::Numpad => "NUMPAD",
            ModeId::Search => "SEARCH",
            ModeId::Menu => "MENU",
        }
    }
}

// =============================================================================
// Mode Trait
// =============================================================================

/// Capability bundle of one interaction mode.
///
/// Implementations are stateless singletons; all state lives in the
/// [`Session`], which is passed to every capability.
pub trait Mode: Send + Sync {
    fn id(&self) -> ModeId;

    /// Whether this mode wants the key. Rejected keys pass through to the
    /// shell untouched.
    fn accepts_key(&self, key: &Key) -> bool;

    /// Handles an accepted key. The default no-ops, so a mode without
    /// input handling never fails the router.
    fn on_input(&self, _session: &mut Session, _key: Key) {}

    /// Called after this mode becomes current. Must be idempotent.
    fn on_enter(&self, _session: &mut Session) {}

    /// Called before another mode becomes current. Must be idempotent.
    fn on_exit(&self, _session: &mut Session) {}
}

/// Resolves a mode id to its singleton implementation.
pub fn mode_for(id: ModeId) -> &'static dyn Mode {
    match id {
        ModeId::Numpad => &NumpadMode,
        ModeId::Search => &SearchMode,
        ModeId::Menu => &MenuMode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_for_resolves_matching_ids() {
        for id in [ModeId::Numpad, ModeId::Search, ModeId::Menu] {
            assert_eq!(mode_for(id).id(), id);
        }
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ModeId::Numpad.name(), "NUMPAD");
        assert_eq!(ModeId::Search.name(), "SEARCH");
        assert_eq!(ModeId::Menu.name(), "MENU");
    }
}
