//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  └── CoreError       - Catalog load and lookup failures                │
//! │                                                                         │
//! │  till-terminal errors (separate crate)                                 │
//! │  └── TerminalError   - Collaborator and session failures               │
//! │                                                                         │
//! │  Flow: CoreError → TerminalError → shell                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, name, etc.)
//! 3. Errors are enum variants, never String
//!
//! A failed catalog load must surface as an error so the search index is
//! never built over a partially applied catalog.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Scanned id has no match in the active catalog.
    ///
    /// ## When This Occurs
    /// - Cashier keys in an unknown item number
    /// - Item belongs to a different business than the active one
    ///
    /// This is a transient signal: ledger and mode state are unaffected.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// An item id in a flat article list is not usable as a catalog id.
    #[error("invalid item id '{id}': {reason}")]
    InvalidItemId { id: String, reason: String },

    /// Two items resolved to the same id within one catalog.
    ///
    /// Ids must be unique within the active catalog; a collision means the
    /// source data is malformed and the load is rejected wholesale.
    #[error("duplicate item id '{0}' in catalog")]
    DuplicateItemId(String),

    /// Item carries a negative price.
    #[error("item '{name}' has negative price {price}")]
    NegativePrice { name: String, price: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemNotFound("0042".to_string());
        assert_eq!(err.to_string(), "item not found: 0042");

        let err = CoreError::NegativePrice {
            name: "Espresso".to_string(),
            price: -1.2,
        };
        assert_eq!(err.to_string(), "item 'Espresso' has negative price -1.2");
    }
}
