//! # Session
//!
//! The synchronous heart of the terminal: current mode, receipt ledger,
//! pending input and quantity. Modes call back into the session; the async
//! [`Terminal`](crate::terminal::Terminal) wraps it and performs the
//! collaborator I/O its signals request.
//!
//! ## Signal Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell key event                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Session::dispatch_key ──► active Mode::on_input                       │
//! │       │                         │                                       │
//! │       │                         ├── ledger / store mutations            │
//! │       │                         └── session.signal(...)                 │
//! │       ▼                                                                 │
//! │  drain_signals() ──► Terminal (print dispatch) ──► shell (error        │
//! │                      border, focus changes, menu open/close)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tracing::debug;

use till_core::{coerce_quantity, sanitize_item_id, CatalogItem, FilterEngine, ReceiptLedger};

use crate::mode::{mode_for, ModeId};
use crate::router::{route, Key};
use crate::store::StateStore;

// =============================================================================
// Session Signals
// =============================================================================

/// Transient, non-fatal notifications produced while handling input.
///
/// Signals are queued during dispatch and drained afterwards; they carry
/// everything a shell needs to mirror the interaction (and everything the
/// async layer needs to trigger collaborator I/O).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    /// The previous mode's exit hook ran.
    ModeExited(ModeId),

    /// The new mode's enter hook ran.
    ModeEntered(ModeId),

    /// SEARCH took over; the shell should focus its search field.
    FocusSearchField,

    /// SEARCH was left; the shell should blur its search field.
    BlurSearchField,

    MenuOpened,
    MenuClosed,

    /// A scanned item landed on the ledger.
    PositionAdded { item_id: String, quantity: u32 },

    /// A scanned id had no catalog match. Ledger and mode state are
    /// unaffected; the shell shows a transient error.
    ItemNotFound { id: String },

    LedgerFinalized,
    LedgerCleared,

    /// NUMPAD `d`: the async layer should render and dispatch the receipt.
    PrintRequested,

    /// The printer collaborator accepted the job.
    PrintCompleted,

    /// The printer collaborator failed; core state is untouched.
    PrintFailed { message: String },
}

// =============================================================================
// Session
// =============================================================================

/// Synchronous terminal state: mode machine, ledger, input buffers.
pub struct Session {
    engine: Arc<Mutex<FilterEngine>>,
    store: Arc<StateStore>,
    ledger: ReceiptLedger,
    current_mode: ModeId,
    signals: Vec<SessionSignal>,

    /// Idempotence guards for the SEARCH/MENU enter and exit hooks.
    pub(crate) search_focused: bool,
    pub(crate) menu_open: bool,
}

impl Session {
    /// Creates a session in NUMPAD mode.
    pub fn new(engine: Arc<Mutex<FilterEngine>>, store: Arc<StateStore>) -> Self {
        Session {
            engine,
            store,
            ledger: ReceiptLedger::new(),
            current_mode: ModeId::Numpad,
            signals: Vec::new(),
            search_focused: false,
            menu_open: false,
        }
    }

    pub fn current_mode(&self) -> ModeId {
        self.current_mode
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn ledger(&self) -> &ReceiptLedger {
        &self.ledger
    }

    // -------------------------------------------------------------------------
    // Mode machine
    // -------------------------------------------------------------------------

    /// Switches the active mode: exit hook, set current, enter hook.
    ///
    /// The ordering is fixed for every transition path, including switches
    /// requested from inside another mode's `on_input`.
    pub fn switch_to(&mut self, target: ModeId) {
        let current = self.current_mode;
        debug!(from = current.name(), to = target.name(), "mode switch");

        mode_for(current).on_exit(self);
        self.signal(SessionSignal::ModeExited(current));

        self.current_mode = target;

        mode_for(target).on_enter(self);
        self.signal(SessionSignal::ModeEntered(target));
    }

    /// Routes one key through the active mode.
    ///
    /// Returns `true` when the key was accepted and handled; rejected keys
    /// return `false` and pass through to the shell untouched.
    pub fn dispatch_key(&mut self, key: Key) -> bool {
        route(self, key)
    }

    /// The shell's search field gained focus (e.g. a mouse click).
    ///
    /// The field is already focused, so the enter hook must not ask the
    /// shell to focus it again; marking it first keeps the hook quiet.
    pub fn search_field_focused(&mut self) {
        self.search_focused = true;
        if self.current_mode != ModeId::Search {
            self.switch_to(ModeId::Search);
        }
    }

    /// The shell's search field lost focus.
    pub fn search_field_blurred(&mut self) {
        self.search_focused = false;
        if self.current_mode == ModeId::Search {
            self.switch_to(ModeId::Numpad);
        }
    }

    // -------------------------------------------------------------------------
    // Signals
    // -------------------------------------------------------------------------

    pub(crate) fn signal(&mut self, signal: SessionSignal) {
        self.signals.push(signal);
    }

    /// Takes all signals queued since the last drain.
    pub fn drain_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }

    // -------------------------------------------------------------------------
    // NUMPAD capabilities
    // -------------------------------------------------------------------------

    /// Appends a digit to the pending input buffer.
    pub(crate) fn push_digit(&mut self, digit: u8) {
        let mut pending = self.store.pending_input();
        pending.push(char::from(b'0' + digit.min(9)));
        self.store.set_pending_input(pending);
    }

    /// Commits the pending buffer as the line quantity and clears it.
    ///
    /// Non-numeric, zero, or empty input coerces to quantity 1.
    pub(crate) fn commit_quantity(&mut self) {
        let quantity = coerce_quantity(&self.store.pending_input());
        self.store.set_quantity(quantity);
        self.store.set_pending_input(String::new());
    }

    /// Backspace: resets buffer and quantity to their defaults.
    pub(crate) fn clear_input(&mut self) {
        self.store.set_quantity(1);
        self.store.set_pending_input(String::new());
    }

    /// NUMPAD `d`: asks the async layer for a print run.
    pub(crate) fn request_print(&mut self) {
        self.signal(SessionSignal::PrintRequested);
    }

    /// NUMPAD Enter.
    ///
    /// Non-empty buffer: sanitize to a 4-digit id, look up, and scan at the
    /// current quantity; an unknown id raises a transient signal. Buffer
    /// and quantity reset to defaults on both paths. Empty buffer:
    /// finalize, or clear an already-finalized ledger.
    pub(crate) fn handle_enter(&mut self) {
        let pending = self.store.pending_input();
        if pending.is_empty() {
            if !self.ledger.is_finalized() {
                if self.ledger.finalize().is_some() {
                    self.signal(SessionSignal::LedgerFinalized);
                }
            } else {
                self.clear();
            }
            return;
        }

        let id = sanitize_item_id(&pending);
        let item = {
            let engine = self.engine.lock().expect("filter engine mutex poisoned");
            engine.catalog().lookup(&id).cloned()
        };

        match item {
            Some(item) => {
                let quantity = self.store.quantity();
                self.add_position(&item, quantity);
            }
            None => {
                debug!(%id, "scan found no catalog match");
                self.signal(SessionSignal::ItemNotFound { id });
            }
        }

        self.store.set_pending_input(String::new());
        self.store.set_quantity(1);
    }

    // -------------------------------------------------------------------------
    // Ledger operations
    // -------------------------------------------------------------------------

    /// Appends an item to the ledger at `quantity` (zero coerces to 1).
    pub fn add_position(&mut self, item: &CatalogItem, quantity: u32) {
        let position = self.ledger.add_position(item, quantity);
        let signal = SessionSignal::PositionAdded {
            item_id: position.item_id.clone(),
            quantity: position.quantity,
        };
        self.signal(signal);
    }

    /// Finalizes the ledger (no-op when empty or already finalized).
    pub fn finalize(&mut self) {
        let was_finalized = self.ledger.is_finalized();
        if self.ledger.finalize().is_some() && !was_finalized {
            self.signal(SessionSignal::LedgerFinalized);
        }
    }

    /// Empties the ledger and resets the finalized flag.
    pub fn clear(&mut self) {
        self.ledger.clear();
        self.signal(SessionSignal::LedgerCleared);
    }

    /// Replaces the ledger wholesale (business switch).
    pub(crate) fn reset_for_business_switch(&mut self) {
        self.ledger.clear();
        self.signal(SessionSignal::LedgerCleared);
        self.store.set_pending_input(String::new());
        self.store.set_quantity(1);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::{Catalog, RawCatalogItem, RawCategory};

    fn engine() -> Arc<Mutex<FilterEngine>> {
        let catalog = Catalog::from_tree(vec![RawCategory {
            category: "Drinks".to_string(),
            items: vec![
                RawCatalogItem {
                    name: "Cola".to_string(),
                    price: 2.5,
                    vat: None,
                },
                RawCatalogItem {
                    name: "Water".to_string(),
                    price: 1.0,
                    vat: None,
                },
            ],
        }])
        .unwrap();
        Arc::new(Mutex::new(FilterEngine::new(catalog)))
    }

    fn session() -> Session {
        Session::new(engine(), Arc::new(StateStore::new()))
    }

    fn mode_pair(signals: &[SessionSignal]) -> (Vec<ModeId>, Vec<ModeId>) {
        let exited = signals
            .iter()
            .filter_map(|s| match s {
                SessionSignal::ModeExited(id) => Some(*id),
                _ => None,
            })
            .collect();
        let entered = signals
            .iter()
            .filter_map(|s| match s {
                SessionSignal::ModeEntered(id) => Some(*id),
                _ => None,
            })
            .collect();
        (exited, entered)
    }

    #[test]
    fn test_initial_mode_is_numpad() {
        assert_eq!(session().current_mode(), ModeId::Numpad);
    }

    #[test]
    fn test_s_switches_to_search_with_one_exit_enter_pair() {
        let mut session = session();
        assert!(session.dispatch_key(Key::Char('s')));
        assert_eq!(session.current_mode(), ModeId::Search);

        let signals = session.drain_signals();
        let (exited, entered) = mode_pair(&signals);
        assert_eq!(exited, vec![ModeId::Numpad]);
        assert_eq!(entered, vec![ModeId::Search]);
        assert!(signals.contains(&SessionSignal::FocusSearchField));
    }

    #[test]
    fn test_rejected_key_never_reaches_on_input() {
        let mut session = session();
        session.dispatch_key(Key::Char('s'));
        session.drain_signals();

        // SEARCH rejects letters; the key passes through untouched
        assert!(!session.dispatch_key(Key::Char('q')));
        assert!(!session.dispatch_key(Key::Digit(4)));
        assert_eq!(session.current_mode(), ModeId::Search);
        assert!(session.drain_signals().is_empty());
    }

    #[test]
    fn test_search_escape_returns_to_numpad_and_blurs() {
        let mut session = session();
        session.dispatch_key(Key::Char('s'));
        session.drain_signals();

        assert!(session.dispatch_key(Key::Escape));
        assert_eq!(session.current_mode(), ModeId::Numpad);
        assert!(session
            .drain_signals()
            .contains(&SessionSignal::BlurSearchField));
        assert!(!session.search_focused);
    }

    #[test]
    fn test_menu_keys() {
        let mut session = session();
        session.dispatch_key(Key::Char('m'));
        assert_eq!(session.current_mode(), ModeId::Menu);
        assert!(session.drain_signals().contains(&SessionSignal::MenuOpened));

        // s jumps straight to SEARCH, closing the menu on the way out
        session.dispatch_key(Key::Char('s'));
        assert_eq!(session.current_mode(), ModeId::Search);
        assert!(session.drain_signals().contains(&SessionSignal::MenuClosed));

        session.dispatch_key(Key::Tab);
        assert_eq!(session.current_mode(), ModeId::Numpad);
    }

    #[test]
    fn test_redundant_focus_request_is_idempotent() {
        let mut session = session();

        // the field focused itself; the mode must not ask for focus again
        session.search_field_focused();
        assert_eq!(session.current_mode(), ModeId::Search);
        let first = session.drain_signals();
        assert!(first.contains(&SessionSignal::ModeEntered(ModeId::Search)));
        assert!(!first.contains(&SessionSignal::FocusSearchField));

        // field reports focus again while SEARCH is already active
        session.search_field_focused();
        assert!(session.drain_signals().is_empty());

        // leaving via blur does not instruct the shell to blur either
        session.search_field_blurred();
        assert_eq!(session.current_mode(), ModeId::Numpad);
        assert!(!session
            .drain_signals()
            .contains(&SessionSignal::BlurSearchField));
    }

    #[test]
    fn test_digits_accumulate_and_backspace_resets() {
        let mut session = session();
        session.dispatch_key(Key::Digit(4));
        session.dispatch_key(Key::Digit(2));
        assert_eq!(session.store().pending_input(), "42");

        session.dispatch_key(Key::Backspace);
        assert_eq!(session.store().pending_input(), "");
        assert_eq!(session.store().quantity(), 1);
    }

    #[test]
    fn test_quantity_commit_and_coercion() {
        let mut session = session();
        session.dispatch_key(Key::Digit(3));
        session.dispatch_key(Key::Char('x'));
        assert_eq!(session.store().quantity(), 3);
        assert_eq!(session.store().pending_input(), "");

        // empty buffer commits as 1
        session.dispatch_key(Key::Char('*'));
        assert_eq!(session.store().quantity(), 1);

        // zero buffer commits as 1
        session.dispatch_key(Key::Digit(0));
        session.dispatch_key(Key::Char('x'));
        assert_eq!(session.store().quantity(), 1);
    }

    #[test]
    fn test_enter_scans_item_at_quantity() {
        let mut session = session();
        session.dispatch_key(Key::Digit(2));
        session.dispatch_key(Key::Char('x'));

        // "1" sanitizes to "0001" (Cola)
        session.dispatch_key(Key::Digit(1));
        session.dispatch_key(Key::Enter);

        assert_eq!(session.ledger().positions().len(), 1);
        let position = &session.ledger().positions()[0];
        assert_eq!(position.item_id, "0001");
        assert_eq!(position.quantity, 2);

        // buffer and quantity are back at defaults
        assert_eq!(session.store().pending_input(), "");
        assert_eq!(session.store().quantity(), 1);
        assert!(session
            .drain_signals()
            .iter()
            .any(|s| matches!(s, SessionSignal::PositionAdded { .. })));
    }

    #[test]
    fn test_enter_unknown_id_signals_not_found() {
        let mut session = session();
        session.dispatch_key(Key::Digit(9));
        session.dispatch_key(Key::Digit(9));
        session.dispatch_key(Key::Enter);

        assert!(session.ledger().is_empty());
        assert_eq!(session.current_mode(), ModeId::Numpad);
        let signals = session.drain_signals();
        assert!(signals.contains(&SessionSignal::ItemNotFound {
            id: "0099".to_string()
        }));
        assert_eq!(session.store().pending_input(), "");
    }

    #[test]
    fn test_enter_empty_buffer_finalizes_then_clears() {
        let mut session = session();
        session.dispatch_key(Key::Digit(1));
        session.dispatch_key(Key::Enter);
        session.drain_signals();

        session.dispatch_key(Key::Enter);
        assert!(session.ledger().is_finalized());
        assert!(session
            .drain_signals()
            .contains(&SessionSignal::LedgerFinalized));

        session.dispatch_key(Key::Enter);
        assert!(!session.ledger().is_finalized());
        assert!(session.ledger().is_empty());
        assert!(session
            .drain_signals()
            .contains(&SessionSignal::LedgerCleared));
    }

    #[test]
    fn test_enter_on_empty_unfinalized_ledger_is_noop() {
        let mut session = session();
        session.dispatch_key(Key::Enter);
        assert!(!session.ledger().is_finalized());
        assert!(session.drain_signals().is_empty());
    }

    #[test]
    fn test_print_request_signal() {
        let mut session = session();
        session.dispatch_key(Key::Char('d'));
        assert!(session
            .drain_signals()
            .contains(&SessionSignal::PrintRequested));
    }
}
