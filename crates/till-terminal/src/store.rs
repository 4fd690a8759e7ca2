//! # State Store
//!
//! Typed application state with explicit per-field change subscription.
//!
//! ## Why Declared Fields?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Store Design                                   │
//! │                                                                         │
//! │  Fields are DECLARED, not dynamic:                                     │
//! │                                                                         │
//! │    quantity        u32            written by the NUMPAD handler        │
//! │    pending_input   String         written by the NUMPAD handler        │
//! │    filtered_view   Arc<Catalog>   written by the scheduler chain       │
//! │                                                                         │
//! │  A write to an undeclared field is unrepresentable - it does not       │
//! │  compile. Listeners register per field via subscribe() and receive     │
//! │  the new value; there are no implicit reactive traps.                  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • values behind one Mutex, listeners behind another                   │
//! │  • listeners run AFTER the value lock is released, so a listener may   │
//! │    read the store without deadlocking                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use till_core::Catalog;

// =============================================================================
// Fields & Changes
// =============================================================================

/// The closed set of declared store fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    Quantity,
    PendingInput,
    FilteredView,
}

/// A change notification payload: which field, and its new value.
#[derive(Debug, Clone)]
pub enum StateChange {
    Quantity(u32),
    PendingInput(String),
    FilteredView(Arc<Catalog>),
}

impl StateChange {
    /// The field this change belongs to.
    pub fn field(&self) -> StateField {
        match self {
            StateChange::Quantity(_) => StateField::Quantity,
            StateChange::PendingInput(_) => StateField::PendingInput,
            StateChange::FilteredView(_) => StateField::FilteredView,
        }
    }
}

type Listener = Box<dyn Fn(&StateChange) + Send + Sync>;

// =============================================================================
// State Store
// =============================================================================

#[derive(Debug, Clone)]
struct StoreValues {
    quantity: u32,
    pending_input: String,
    filtered_view: Arc<Catalog>,
}

/// Shared terminal state: quantity, pending input, filtered view.
///
/// Every setter fires the field's listeners with the new value, matching
/// the original change-notification contract (notify on every write, not
/// only on value changes).
pub struct StateStore {
    values: Mutex<StoreValues>,
    listeners: Mutex<HashMap<StateField, Vec<Listener>>>,
}

impl StateStore {
    pub fn new() -> Self {
        StateStore {
            values: Mutex::new(StoreValues {
                quantity: 1,
                pending_input: String::new(),
                filtered_view: Arc::new(Catalog::default()),
            }),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a callback fired on every write to `field`.
    pub fn subscribe<F>(&self, field: StateField, callback: F)
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .entry(field)
            .or_default()
            .push(Box::new(callback));
    }

    pub fn quantity(&self) -> u32 {
        self.values.lock().expect("store mutex poisoned").quantity
    }

    pub fn set_quantity(&self, quantity: u32) {
        self.values.lock().expect("store mutex poisoned").quantity = quantity;
        self.notify(StateChange::Quantity(quantity));
    }

    pub fn pending_input(&self) -> String {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .pending_input
            .clone()
    }

    pub fn set_pending_input(&self, input: impl Into<String>) {
        let input = input.into();
        self.values
            .lock()
            .expect("store mutex poisoned")
            .pending_input = input.clone();
        self.notify(StateChange::PendingInput(input));
    }

    pub fn filtered_view(&self) -> Arc<Catalog> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .filtered_view
            .clone()
    }

    pub fn set_filtered_view(&self, view: Arc<Catalog>) {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .filtered_view = view.clone();
        self.notify(StateChange::FilteredView(view));
    }

    fn notify(&self, change: StateChange) {
        let listeners = self.listeners.lock().expect("listener mutex poisoned");
        if let Some(subscribers) = listeners.get(&change.field()) {
            for listener in subscribers {
                listener(&change);
            }
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.lock().expect("store mutex poisoned");
        f.debug_struct("StateStore")
            .field("quantity", &values.quantity)
            .field("pending_input", &values.pending_input)
            .field("filtered_view_items", &values.filtered_view.item_count())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
