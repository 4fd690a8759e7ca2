//! # Terminal
//!
//! The async orchestrator: wraps the synchronous [`Session`] and performs
//! the collaborator I/O its signals request.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Terminal Startup                                  │
//! │                                                                         │
//! │  1. Discover businesses via the CatalogSource ────────────────────────► │
//! │                                                                         │
//! │  2. Spawn the latest-wins filter scheduler ───────────────────────────► │
//! │                                                                         │
//! │  3. Switch to the first business ─────────────────────────────────────► │
//! │     • fetch catalog FIRST; a failed load leaves nothing half-applied    │
//! │     • install catalog, rebuild index, reseed filter cache               │
//! │     • clear ledger, reset pending input and quantity                    │
//! │                                                                         │
//! │  4. NUMPAD mode, ready for key events ────────────────────────────────► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use till_core::{Catalog, CatalogItem, FilterEngine, ReceiptLedger};

use crate::document::ReceiptDocument;
use crate::error::{TerminalError, TerminalResult};
use crate::mode::ModeId;
use crate::router::Key;
use crate::scheduler::{FilterScheduler, Token};
use crate::session::{Session, SessionSignal};
use crate::source::{BusinessConfig, CatalogSource, ReceiptPrinter};
use crate::store::StateStore;

// =============================================================================
// Key Dispatch Result
// =============================================================================

/// Outcome of routing one key event.
#[derive(Debug)]
pub struct KeyDispatch {
    /// Whether the active mode accepted the key (shell suppresses its
    /// default behavior); rejected keys pass through untouched.
    pub consumed: bool,

    /// Signals raised while handling the key, print outcome included.
    pub signals: Vec<SessionSignal>,
}

// =============================================================================
// Terminal
// =============================================================================

/// A running cashier terminal bound to one catalog source and one printer.
pub struct Terminal {
    session: Session,
    scheduler: FilterScheduler,
    engine: Arc<Mutex<FilterEngine>>,
    store: Arc<StateStore>,
    source: Arc<dyn CatalogSource>,
    printer: Arc<dyn ReceiptPrinter>,
    businesses: Vec<BusinessConfig>,
    active: Option<BusinessConfig>,
    header: Vec<String>,
}

impl Terminal {
    /// Discovers businesses and starts on the first one.
    pub async fn start(
        source: Arc<dyn CatalogSource>,
        printer: Arc<dyn ReceiptPrinter>,
    ) -> TerminalResult<Self> {
        let businesses = source.businesses().await?;
        let default = businesses
            .first()
            .cloned()
            .ok_or(TerminalError::NoBusinesses)?;

        let engine = Arc::new(Mutex::new(FilterEngine::new(Catalog::default())));
        let store = Arc::new(StateStore::new());
        let session = Session::new(engine.clone(), store.clone());
        let scheduler = FilterScheduler::spawn();

        let mut terminal = Terminal {
            session,
            scheduler,
            engine,
            store,
            source,
            printer,
            businesses,
            active: None,
            header: Vec::new(),
        };
        terminal.switch_business(&default.path).await?;
        // setup noise (ledger reset, view install) is not interaction
        terminal.session.drain_signals();

        info!(business = %default.name, "terminal started");
        Ok(terminal)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Routes one key event and performs any collaborator I/O it requested.
    pub async fn dispatch_key(&mut self, key: Key) -> KeyDispatch {
        debug!(?key, mode = self.session.current_mode().name(), "dispatch_key");
        let consumed = self.session.dispatch_key(key);
        let mut signals = self.session.drain_signals();

        if signals.contains(&SessionSignal::PrintRequested) {
            match self.print_receipt().await {
                Ok(()) => signals.push(SessionSignal::PrintCompleted),
                Err(err) => {
                    warn!(%err, "receipt print failed");
                    signals.push(SessionSignal::PrintFailed {
                        message: err.to_string(),
                    });
                }
            }
        }

        KeyDispatch { consumed, signals }
    }

    /// Explicit mode switch (on-screen buttons, focus events).
    pub fn switch_to(&mut self, target: ModeId) {
        self.session.switch_to(target);
    }

    pub fn search_field_focused(&mut self) {
        self.session.search_field_focused();
    }

    pub fn search_field_blurred(&mut self) {
        self.session.search_field_blurred();
    }

    /// Takes signals queued outside of `dispatch_key` (mode switches,
    /// business switches).
    pub fn drain_signals(&mut self) -> Vec<SessionSignal> {
        self.session.drain_signals()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Submits a filter run for `query` through the latest-wins scheduler.
    ///
    /// Returns immediately with the unit's token; the filtered view lands
    /// in the store when (and only if) the unit is still the most recent
    /// at execution time. Only the scheduler chain writes that field.
    pub fn submit_filter(&self, query: &str) -> Token {
        let engine = self.engine.clone();
        let store = self.store.clone();
        let query = query.to_string();
        self.scheduler.submit(async move {
            let view = engine
                .lock()
                .expect("filter engine mutex poisoned")
                .filter(&query);
            store.set_filtered_view(view);
            Ok(())
        })
    }

    /// Resolves once all submitted filter units have run or been skipped.
    pub async fn filters_settled(&self) {
        self.scheduler.idle().await;
    }

    // -------------------------------------------------------------------------
    // Business switching
    // -------------------------------------------------------------------------

    /// Switches to the business at `path`.
    ///
    /// The new catalog is fetched and normalized FIRST; any failure
    /// propagates and leaves catalog, index, cache, ledger and view
    /// untouched. On success the prior filter cache is discarded wholesale
    /// and the terminal returns to NUMPAD.
    pub async fn switch_business(&mut self, path: &str) -> TerminalResult<()> {
        let config = self
            .businesses
            .iter()
            .find(|business| business.path == path)
            .cloned()
            .ok_or_else(|| TerminalError::UnknownBusiness(path.to_string()))?;

        let raw = self.source.load_catalog(&config).await?;
        let catalog = raw.into_catalog()?;
        let header = self.source.load_header(&config).await?;

        // Everything fetched and validated; now apply atomically.
        {
            let mut engine = self.engine.lock().expect("filter engine mutex poisoned");
            engine.install(catalog);
            self.store.set_filtered_view(engine.catalog().clone());
        }
        self.session.reset_for_business_switch();
        self.header = header;
        info!(business = %config.name, items = self.store.filtered_view().item_count(),
              "business switched");
        self.active = Some(config);

        if self.session.current_mode() != ModeId::Numpad {
            self.session.switch_to(ModeId::Numpad);
        }
        Ok(())
    }

    pub fn businesses(&self) -> &[BusinessConfig] {
        &self.businesses
    }

    pub fn active_business(&self) -> Option<&BusinessConfig> {
        self.active.as_ref()
    }

    // -------------------------------------------------------------------------
    // Ledger operations
    // -------------------------------------------------------------------------

    pub fn add_position(&mut self, item: &CatalogItem, quantity: u32) {
        self.session.add_position(item, quantity);
    }

    pub fn finalize(&mut self) {
        self.session.finalize();
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    pub fn ledger(&self) -> &ReceiptLedger {
        self.session.ledger()
    }

    /// Renders the current receipt and hands it to the printer.
    pub async fn print_receipt(&self) -> TerminalResult<()> {
        let document = ReceiptDocument::render(
            self.session.ledger(),
            &self.header,
            Utc::now().date_naive(),
        );
        self.printer.print(&document).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn current_mode(&self) -> ModeId {
        self.session.current_mode()
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn receipt_header(&self) -> &[String] {
        &self.header
    }

    /// Stops the scheduler, letting queued units drain first.
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
    }
}
