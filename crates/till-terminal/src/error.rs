//! # Error Types
//!
//! Terminal-layer errors, layered over till-core's `CoreError`.
//!
//! ```text
//! Flow: CoreError → TerminalError → shell
//!       SourceError ──┘      ▲
//!       PrinterError ────────┘
//! ```

use thiserror::Error;
use till_core::CoreError;

// =============================================================================
// Collaborator Errors
// =============================================================================

/// Failures reported by a catalog source implementation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested business is not known to this source.
    #[error("business not found: {0}")]
    UnknownBusiness(String),

    /// The source delivered data the core cannot load.
    ///
    /// Malformed data is never swallowed: the load fails wholesale so the
    /// search index is never built over a partially applied catalog.
    #[error("malformed catalog data: {0}")]
    Malformed(String),

    /// The source could not be reached at all.
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by a printer implementation.
#[derive(Debug, Error)]
pub enum PrinterError {
    #[error("printer rejected job: {0}")]
    Rejected(String),

    #[error("printer unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Terminal Error
// =============================================================================

/// Top-level error for terminal operations.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Core domain error (catalog load, lookup).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Catalog source collaborator failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Printer collaborator failed.
    #[error("printer error: {0}")]
    Printer(#[from] PrinterError),

    /// A business switch named a business the terminal does not know.
    #[error("unknown business: {0}")]
    UnknownBusiness(String),

    /// The source discovered no businesses at startup.
    #[error("no businesses available")]
    NoBusinesses,
}

/// Convenience type alias for Results with TerminalError.
pub type TerminalResult<T> = Result<T, TerminalError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_layering() {
        let core = CoreError::ItemNotFound("0042".to_string());
        let terminal: TerminalError = core.into();
        assert!(matches!(terminal, TerminalError::Core(_)));

        let source = SourceError::Malformed("bad json".to_string());
        let terminal: TerminalError = source.into();
        assert_eq!(
            terminal.to_string(),
            "source error: malformed catalog data: bad json"
        );
    }
}
