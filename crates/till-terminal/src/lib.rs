//! # till-terminal: Interaction Layer for Till
//!
//! Everything between the pure core and the shell: the mode state machine,
//! the input router, the typed state store, the latest-wins filter
//! scheduler, and the async terminal orchestrator.
//!
//! ## Module Organization
//! ```text
//! till_terminal/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── mode/
//! │   ├── mod.rs      ◄─── Mode trait, ModeId, registry
//! │   ├── numpad.rs   ◄─── Scan-and-commit key handling
//! │   ├── search.rs   ◄─── Search field handover
//! │   └── menu.rs     ◄─── Business picker
//! ├── router.rs       ◄─── Key events, accept-or-pass-through dispatch
//! ├── store.rs        ◄─── Typed state store with per-field subscribe
//! ├── scheduler.rs    ◄─── Latest-wins single-consumer task queue
//! ├── session.rs      ◄─── Synchronous state: ledger, mode, signals
//! ├── terminal.rs     ◄─── Async orchestrator over the collaborators
//! ├── source.rs       ◄─── CatalogSource / ReceiptPrinter contracts
//! ├── document.rs     ◄─── Printable receipt markup
//! └── error.rs        ◄─── TerminalError and collaborator errors
//! ```
//!
//! ## Control Flow
//! ```text
//! key event ──► router ──► active mode ──► (NUMPAD) receipt ledger
//!                                      └─► (SEARCH) scheduler ──► filter
//!                                          engine ──► store.filtered_view
//!                                          ──► change notification ──► shell
//! ```

pub mod document;
pub mod error;
pub mod mode;
pub mod router;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod store;
pub mod terminal;

pub use document::ReceiptDocument;
pub use error::{PrinterError, SourceError, TerminalError, TerminalResult};
pub use mode::{Mode, ModeId};
pub use router::Key;
pub use scheduler::{FilterScheduler, Token};
pub use session::{Session, SessionSignal};
pub use source::{BusinessConfig, CatalogSource, NoOpPrinter, ReceiptPrinter, StaticSource};
pub use store::{StateChange, StateField, StateStore};
pub use terminal::{KeyDispatch, Terminal};
