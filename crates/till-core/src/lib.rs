//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of the Till cashier terminal. It contains all
//! business logic as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/till-cli (shell)                        │   │
//! │  │      key events ──► rendering ──► printing dispatch             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-terminal                                │   │
//! │  │    modes, input router, state store, latest-wins scheduler      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    vat    │  │  catalog  │  │  receipt  │  │  search   │  │   │
//! │  │   │  VatCode  │  │  Catalog  │  │  Ledger   │  │  Index    │  │   │
//! │  │   │  rates    │  │  item ids │  │  Totals   │  │  Filter   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`vat`] - VAT codes and the fixed rate table
//! - [`catalog`] - Catalog tree, deterministic item id assignment, lookup
//! - [`receipt`] - Receipt ledger with full-precision VAT-split totals
//! - [`search`] - Search index, query parsing, memoized incremental filtering
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system and clock access is FORBIDDEN here
//! 3. **Full-Precision Money**: Line amounts accumulate as f64 at full precision;
//!    rounding to two decimals happens only at presentation
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod receipt;
pub mod search;
pub mod vat;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Catalog` instead of
// `use till_core::catalog::Catalog`

pub use catalog::{
    sanitize_item_id, Catalog, CatalogItem, Category, RawArticle, RawCatalog, RawCatalogItem,
    RawCategory,
};
pub use error::{CoreError, CoreResult};
pub use receipt::{coerce_quantity, ReceiptLedger, ReceiptPosition, ReceiptTotals};
pub use search::{parse_query, FilterEngine, SearchIndex};
pub use vat::VatCode;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of digits in a catalog item id.
///
/// ## Why a constant?
/// Item ids are zero-padded, fixed-width strings ("0001") so they sort,
/// display, and scan predictably. Every assignment and lookup path pads to
/// this width.
pub const ITEM_ID_DIGITS: usize = 4;

/// Category name used when a business provides a flat article list.
///
/// Editable businesses persist articles without categories; the catalog
/// wraps them in this single category so both shapes flow through the same
/// code paths.
pub const FLAT_CATALOG_CATEGORY: &str = "General";
